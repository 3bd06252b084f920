use crate::validation::PropertyValidationResult;
use common::error::DiagnosticMessage;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("connector type not found: {context}")]
    NotFound { id: String, context: DiagnosticMessage },
    #[error("duplicate connector type: {context}")]
    Duplicate { context: DiagnosticMessage },
    #[error("unsupported property type: {context}")]
    UnsupportedType { context: DiagnosticMessage },
}

impl RegistryError {
    #[track_caller]
    pub fn not_found(id: &str) -> Self {
        Self::NotFound {
            id: id.to_string(),
            context: DiagnosticMessage::new(unknown_type_message(id)),
        }
    }

    #[track_caller]
    pub fn duplicate(id: &str) -> Self {
        Self::Duplicate {
            context: DiagnosticMessage::new(format!(
                "connector type '{id}' is registered more than once"
            )),
        }
    }

    #[track_caller]
    pub fn unsupported_type(connector: &str, key: &str, native: &str) -> Self {
        Self::UnsupportedType {
            context: DiagnosticMessage::new(format!(
                "Unsupported property type: {native} (property '{key}' of connector type '{connector}')"
            )),
        }
    }
}

pub fn unknown_type_message(id: &str) -> String {
    format!("Unknown connector type: {id}")
}

/// Failure reported by a capability's live probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe failed in a way attributable to one property.
    #[error("{property}: {context}")]
    Property {
        property: String,
        context: DiagnosticMessage,
    },
    #[error("probe failed: {context}")]
    Failed {
        context: DiagnosticMessage,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    #[error("not supported: {context}")]
    Unsupported { context: DiagnosticMessage },
}

impl ProbeError {
    #[track_caller]
    pub fn property(property: &str, message: impl Into<String>) -> Self {
        Self::Property {
            property: property.to_string(),
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn failed<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Failed {
            context: DiagnosticMessage::new(err.to_string()),
            source: Some(Box::new(err)),
        }
    }

    #[track_caller]
    pub fn failed_msg(message: impl Into<String>) -> Self {
        Self::Failed {
            context: DiagnosticMessage::new(message.into()),
            source: None,
        }
    }

    #[track_caller]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Property { context, .. }
            | Self::Failed { context, .. }
            | Self::Unsupported { context } => context.message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown connector type: {context}")]
    UnknownType { id: String, context: DiagnosticMessage },
    /// A live data-source probe failed while resolving filters.
    #[error("filter probe failed: {context}")]
    Probe {
        context: DiagnosticMessage,
        #[source]
        source: ProbeError,
    },
}

impl PipelineError {
    #[track_caller]
    pub fn unknown_type(id: &str) -> Self {
        Self::UnknownType {
            id: id.to_string(),
            context: DiagnosticMessage::new(unknown_type_message(id)),
        }
    }

    #[track_caller]
    pub fn probe(source: ProbeError) -> Self {
        Self::Probe {
            context: DiagnosticMessage::new("Failed to apply table filters"),
            source,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::UnknownType { context, .. } | Self::Probe { context, .. } => context.message(),
        }
    }
}

impl From<RegistryError> for PipelineError {
    #[track_caller]
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { id, .. } => PipelineError::unknown_type(&id),
            other => PipelineError::probe(ProbeError::failed(other)),
        }
    }
}

/// Collects cross-field problems after the per-field pass. A property that
/// already failed keeps its first error.
#[derive(Default)]
pub struct ErrorBag {
    results: Vec<PropertyValidationResult>,
}

impl ErrorBag {
    pub fn new(results: Vec<PropertyValidationResult>) -> Self {
        Self { results }
    }

    fn has_error(&self, property: &str) -> bool {
        self.results.iter().any(|r| r.property == property)
    }

    fn push(&mut self, property: &str, message: String) {
        if !self.has_error(property) {
            self.results
                .push(PropertyValidationResult::new(property, message));
        }
    }

    pub fn check_mutually_exclusive<A, B>(
        &mut self,
        name_a: &str,
        a: Option<A>,
        name_b: &str,
        b: Option<B>,
    ) {
        if a.is_some() && b.is_some() {
            self.push(
                name_b,
                format!("{name_a} and {name_b} cannot be set at the same time."),
            );
        }
    }

    pub fn finish(self) -> Vec<PropertyValidationResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_error_lands_on_second_key() {
        let mut bag = ErrorBag::default();
        bag.check_mutually_exclusive("table.include.list", Some("a"), "table.exclude.list", Some("b"));
        bag.check_mutually_exclusive("schema.include.list", Some("a"), "schema.exclude.list", None::<&str>);
        let results = bag.finish();
        assert_eq!(
            results,
            vec![PropertyValidationResult::new(
                "table.exclude.list",
                "table.include.list and table.exclude.list cannot be set at the same time."
            )]
        );
    }

    #[test]
    fn existing_error_is_kept() {
        let mut bag = ErrorBag::new(vec![PropertyValidationResult::new("table.exclude.list", "bad regex")]);
        bag.check_mutually_exclusive("table.include.list", Some("a"), "table.exclude.list", Some("("));
        let results = bag.finish();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message, "bad regex");
    }
}
