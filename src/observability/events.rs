//! Observable events
//!
//! Events are explicit and typed. Each maps to a stable event name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the model layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Model declarations read from disk
    DefinitionsLoaded,

    // Model types
    /// A model declaration was accepted by the registry
    ModelRegistered,
    /// A model type's effective schema was computed
    SchemaResolved,
    /// A type was produced by `exclude`/`subset`
    TypeDerived,

    // Instances
    /// An instance was constructed
    InstanceConstructed,
    /// Raw input was translated through a mapping spec
    MappingApplied,
    /// A read or write of an undeclared attribute was refused
    UndeclaredFieldRejected,
    /// An instance or document was validated
    ValidationCompleted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DefinitionsLoaded => "DEFINITIONS_LOADED",
            Event::ModelRegistered => "MODEL_REGISTERED",
            Event::SchemaResolved => "SCHEMA_RESOLVED",
            Event::TypeDerived => "TYPE_DERIVED",
            Event::InstanceConstructed => "INSTANCE_CONSTRUCTED",
            Event::MappingApplied => "MAPPING_APPLIED",
            Event::UndeclaredFieldRejected => "UNDECLARED_FIELD_REJECTED",
            Event::ValidationCompleted => "VALIDATION_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::DefinitionsLoaded | Event::ModelRegistered => {
                Severity::Info
            }
            Event::UndeclaredFieldRejected => Severity::Warn,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::DefinitionsLoaded,
            Event::ModelRegistered,
            Event::SchemaResolved,
            Event::TypeDerived,
            Event::InstanceConstructed,
            Event::MappingApplied,
            Event::UndeclaredFieldRejected,
            Event::ValidationCompleted,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_hot_path_events_are_trace() {
        assert_eq!(Event::InstanceConstructed.severity(), Severity::Trace);
        assert_eq!(Event::SchemaResolved.severity(), Severity::Trace);
        assert_eq!(Event::UndeclaredFieldRejected.severity(), Severity::Warn);
    }
}
