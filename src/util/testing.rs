use std::cell::{Cell, RefCell};
use std::env;
use std::sync::Once;

use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::builder::{Attributes, Backend, Child, Embedded};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = [""];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| !name.is_empty() && metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Element {
        name: String,
        children: Vec<Child<usize>>,
        attributes: Attributes,
    },
    Embed {
        content: Vec<Child<usize>>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("recording backend failure: {0}")]
pub struct RecordingError(pub String);

/// Backend that records every request. Nodes are sequence numbers.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    next_node: Cell<usize>,
    fail_with: Option<String>,
}

impl RecordingBackend {
    /// Backend whose every call fails with `message`, after being recorded.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn element_calls(&self) -> Vec<(String, Vec<Child<usize>>, Attributes)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Element {
                    name,
                    children,
                    attributes,
                } => Some((name.clone(), children.clone(), attributes.clone())),
                Call::Embed { .. } => None,
            })
            .collect()
    }

    fn next(&self) -> usize {
        let node = self.next_node.get();
        self.next_node.set(node + 1);
        node
    }

    fn check(&self) -> Result<(), RecordingError> {
        match &self.fail_with {
            Some(message) => Err(RecordingError(message.clone())),
            None => Ok(()),
        }
    }
}

impl Backend for RecordingBackend {
    type Node = usize;
    type Error = RecordingError;

    fn element(
        &self,
        name: &str,
        children: Vec<Child<usize>>,
        attributes: Attributes,
    ) -> Result<usize, RecordingError> {
        self.calls.borrow_mut().push(Call::Element {
            name: name.to_string(),
            children,
            attributes,
        });
        self.check()?;
        Ok(self.next())
    }

    fn embed(&self, content: Vec<Child<usize>>) -> Result<Embedded<usize>, RecordingError> {
        let nodes = content
            .iter()
            .map(|child| match child {
                Child::Node(node) => *node,
                _ => self.next(),
            })
            .collect();
        self.calls.borrow_mut().push(Call::Embed { content });
        self.check()?;
        Ok(Embedded::from_vec(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn test_recording_backend_numbers_nodes() {
        let backend = RecordingBackend::default();
        assert_eq!(backend.element("a", vec![], Attributes::new()), Ok(0));
        assert_eq!(backend.element("b", vec![], Attributes::new()), Ok(1));
        assert_eq!(backend.calls().len(), 2);
    }
}
