//! String backend: renders elements directly to XML markup.

use std::fmt;

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::backends::error::{BackendError, BackendResult};
use crate::backends::escape::{escape_attribute, escape_text, NameValidator};
use crate::builder::{Attributes, Backend, Child, Embedded, TreeBuilder};
use crate::config::MarkupSettings;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// An already serialized fragment. Spliced verbatim when used as a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Markup(String);

impl Markup {
    /// Wrap trusted, already serialized markup.
    pub fn raw(markup: impl Into<String>) -> Self {
        Markup(markup.into())
    }

    /// Escape `text` into a text fragment.
    pub fn text(text: &str) -> Self {
        Markup(escape_text(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Render as a standalone document, optionally with an XML declaration.
    pub fn document(&self, xml_declaration: bool) -> String {
        if xml_declaration {
            format!("{}\n{}", XML_DECLARATION, self.0)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Backend producing [`Markup`] strings. Stateless, so it can be shared freely.
#[derive(Debug, Clone)]
pub struct MarkupBackend {
    self_close_empty: bool,
    xml_declaration: bool,
    names: Option<NameValidator>,
}

impl Default for MarkupBackend {
    fn default() -> Self {
        Self::from_settings(&MarkupSettings::default())
    }
}

impl MarkupBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &MarkupSettings) -> Self {
        Self {
            self_close_empty: settings.self_close_empty,
            xml_declaration: settings.xml_declaration,
            names: settings.validate_names.then(NameValidator::new),
        }
    }

    /// Render `root` as a document according to the configured declaration setting.
    pub fn document(&self, root: &Markup) -> String {
        root.document(self.xml_declaration)
    }

    fn check_name(&self, name: &str) -> BackendResult<()> {
        match &self.names {
            Some(validator) if !validator.is_valid(name) => {
                Err(BackendError::InvalidName(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn render_child(child: Child<Markup>) -> BackendResult<Markup> {
        match child {
            Child::Scalar(scalar) => Ok(Markup::text(&scalar.to_string())),
            Child::Node(markup) => Ok(markup),
            Child::Mapping(_) => Err(BackendError::UnsupportedContent(
                "mapping cannot be rendered as markup".to_string(),
            )),
        }
    }

    fn render_attributes(&self, attributes: &Attributes) -> BackendResult<String> {
        for name in attributes.keys() {
            self.check_name(name)?;
        }
        Ok(attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attribute(&value.to_string())))
            .join(""))
    }
}

impl Backend for MarkupBackend {
    type Node = Markup;
    type Error = BackendError;

    #[instrument(level = "trace", skip(self, children, attributes))]
    fn element(
        &self,
        name: &str,
        children: Vec<Child<Markup>>,
        attributes: Attributes,
    ) -> BackendResult<Markup> {
        self.check_name(name)?;
        let mut out = format!("<{}{}", name, self.render_attributes(&attributes)?);
        if children.is_empty() && self.self_close_empty {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in children {
                out.push_str(Self::render_child(child)?.as_str());
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        trace!("element: rendered {} bytes", out.len());
        Ok(Markup(out))
    }

    #[instrument(level = "trace", skip_all)]
    fn embed(&self, content: Vec<Child<Markup>>) -> BackendResult<Embedded<Markup>> {
        let fragments = content
            .into_iter()
            .map(Self::render_child)
            .collect::<BackendResult<Vec<_>>>()?;
        Ok(Embedded::from_vec(fragments))
    }
}

impl TreeBuilder<MarkupBackend> {
    /// Builder rendering straight to markup strings.
    pub fn markup() -> Self {
        Self::new(MarkupBackend::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Scalar;

    #[test]
    fn test_element_renders_sorted_attributes() {
        let backend = MarkupBackend::default();
        let attributes = Attributes::from([
            ("z".to_string(), Scalar::from("1")),
            ("a".to_string(), Scalar::from("\"q\"")),
        ]);
        let node = backend
            .element("p", vec![Child::text("a & b")], attributes)
            .unwrap();
        assert_eq!(node.as_str(), r#"<p a="&quot;q&quot;" z="1">a &amp; b</p>"#);
    }

    #[test]
    fn test_empty_element_self_closes_by_default() {
        let node = MarkupBackend::default()
            .element("br", vec![], Attributes::new())
            .unwrap();
        assert_eq!(node.as_str(), "<br/>");
    }

    #[test]
    fn test_empty_element_open_close_when_configured() {
        let settings = MarkupSettings {
            self_close_empty: false,
            ..MarkupSettings::default()
        };
        let node = MarkupBackend::from_settings(&settings)
            .element("div", vec![], Attributes::new())
            .unwrap();
        assert_eq!(node.as_str(), "<div></div>");
    }

    #[test]
    fn test_document_with_declaration() {
        let root = Markup::raw("<r/>");
        assert_eq!(
            root.document(true),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r/>"
        );
        assert_eq!(root.document(false), "<r/>");
    }
}
