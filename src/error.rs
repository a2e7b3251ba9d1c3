//! Error types for stargen.
//!
//! This module provides error types for parameter validation and for
//! misuse of the galaxy lifecycle.

use std::fmt;

/// Errors raised when a parameter assignment is rejected.
///
/// The offending field always keeps its previous valid value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Value must be finite and strictly greater than zero.
    NotPositive { key: &'static str, value: f64 },
    /// Value must be finite and not below zero.
    Negative { key: &'static str, value: f64 },
    /// Value exceeds the field's hard limit.
    TooLarge { key: &'static str, value: f64, limit: f64 },
    /// Value is NaN or infinite.
    NotFinite { key: &'static str },
    /// A color channel lies outside `[0, 1]`.
    ColorOutOfRange { key: &'static str, channel: f32 },
    /// Value has the wrong shape for the field (e.g. a string for a count).
    InvalidValue { key: &'static str, reason: String },
    /// Value is valid alone but not together with the other fields.
    Conflict { key: &'static str, reason: String },
    /// Hex color string could not be parsed.
    InvalidHex(String),
    /// Configuration payload is not a JSON object, or has no known model tag.
    InvalidConfig(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::NotPositive { key, value } => {
                write!(f, "Parameter '{}' must be positive, got {}", key, value)
            }
            ParameterError::Negative { key, value } => {
                write!(f, "Parameter '{}' must not be negative, got {}", key, value)
            }
            ParameterError::TooLarge { key, value, limit } => {
                write!(f, "Parameter '{}' must be at most {}, got {}", key, limit, value)
            }
            ParameterError::NotFinite { key } => write!(f, "Parameter '{}' must be finite", key),
            ParameterError::ColorOutOfRange { key, channel } => write!(
                f,
                "Color '{}' has channel {} outside the range [0, 1]",
                key, channel
            ),
            ParameterError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for parameter '{}': {}", key, reason)
            }
            ParameterError::Conflict { key, reason } => {
                write!(f, "Parameter '{}' conflicts with the other fields: {}", key, reason)
            }
            ParameterError::InvalidHex(s) => {
                write!(f, "Invalid hex color '{}', expected \"#rrggbb\"", s)
            }
            ParameterError::InvalidConfig(msg) => write!(f, "Invalid galaxy configuration: {}", msg),
        }
    }
}

impl std::error::Error for ParameterError {}

/// Errors raised by the galaxy lifecycle and the active-galaxy switch.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// Operation needs an active galaxy (e.g. `update` before `init`).
    NotActive,
    /// No galaxy registered under this id.
    UnknownGalaxy(usize),
    /// Regeneration was rejected because the parameter update was invalid.
    Parameter(ParameterError),
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotActive => {
                write!(f, "Galaxy is not active. Call init() before update().")
            }
            LifecycleError::UnknownGalaxy(id) => write!(f, "No galaxy registered with id {}", id),
            LifecycleError::Parameter(e) => write!(f, "Regeneration rejected: {}", e),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Parameter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for LifecycleError {
    fn from(e: ParameterError) -> Self {
        LifecycleError::Parameter(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parameter_error_message_names_key() {
        let err = ParameterError::NotPositive { key: "radius", value: -1.0 };
        let msg = err.to_string();
        assert!(msg.contains("radius"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_lifecycle_error_source() {
        let inner = ParameterError::NotFinite { key: "spin" };
        let err: LifecycleError = inner.clone().into();
        assert_eq!(err, LifecycleError::Parameter(inner));
        assert!(err.source().is_some());
        assert!(LifecycleError::NotActive.source().is_none());
    }
}
