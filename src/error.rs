//! The failure taxonomy exposed to callers.

use std::fmt;

use crate::config::ConfigError;

/// Errors a `check` call (or the registry/combinators it relies on) can
/// surface. `GeneratorExhausted` from `Gen::filter` is the one taxonomy
/// member that is raised as a panic instead — see DESIGN.md.
#[derive(Debug, Clone)]
pub enum CheckError {
    /// A user assertion failed; carries the minimized input's rendering.
    PropertyFailed { label: String, value: String },
    /// Shrinking's final replay could not reproduce the original failure.
    NondeterministicProperty { label: String },
    /// A `filter`/`such_that` predicate was not satisfiable in 100 tries.
    GeneratorExhausted,
    /// A duplicate registration for the same type.
    AlreadyRegistered { type_name: &'static str },
    /// A registry lookup found no matching singleton or factory.
    NotRegistered { type_name: &'static str },
    /// Misuse of a combinator (e.g. an empty `frequency` table).
    InvalidArgument(String),
    /// A malformed `TestConfig`/`GeneratorConfig`.
    Config(ConfigError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::PropertyFailed { label, value } => {
                write!(f, "Property '{}' failed for input:\n{}", label, value)
            }
            CheckError::NondeterministicProperty { label } => {
                write!(
                    f,
                    "Property '{}' is nondeterministic: the final shrink replay did not reproduce the failure",
                    label
                )
            }
            CheckError::GeneratorExhausted => {
                write!(f, "generator exhausted: a filter could not be satisfied in 100 tries")
            }
            CheckError::AlreadyRegistered { type_name } => {
                write!(f, "an arbitrary for '{}' is already registered", type_name)
            }
            CheckError::NotRegistered { type_name } => {
                write!(f, "no arbitrary registered for '{}'", type_name)
            }
            CheckError::InvalidArgument(message) => {
                write!(f, "invalid argument: {}", message)
            }
            CheckError::Config(inner) => write!(f, "{}", inner),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<ConfigError> for CheckError {
    fn from(inner: ConfigError) -> Self {
        CheckError::Config(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_failed_message_matches_report_format() {
        let err = CheckError::PropertyFailed {
            label: "my_prop".to_string(),
            value: "(1, 2)".to_string(),
        };
        assert_eq!(err.to_string(), "Property 'my_prop' failed for input:\n(1, 2)");
    }

    #[test]
    fn not_registered_names_the_type() {
        let err = CheckError::NotRegistered { type_name: "Widget" };
        assert!(err.to_string().contains("Widget"));
    }
}
