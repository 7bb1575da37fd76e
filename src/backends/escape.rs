//! XML escaping and name checks shared by the bundled backends.

use regex::Regex;

/// Escape character data.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out
}

/// Checks element and attribute names against the XML `Name` production
/// (restricted to the common character ranges).
#[derive(Debug, Clone)]
pub struct NameValidator {
    name_regex: Regex,
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameValidator {
    pub fn new() -> Self {
        Self {
            name_regex: Regex::new(
                r"^[:A-Z_a-z\u{C0}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}][:A-Z_a-z0-9.\-\u{B7}\u{C0}-\u{37D}\u{37F}-\u{1FFF}\u{203F}-\u{2040}]*$",
            )
            .unwrap(),
        }
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.name_regex.is_match(name)
    }
}
