//! Error types for Plasmo operations.
//!
//! Only configuration and persistence can fail. The simulation itself
//! never returns an error: degenerate networks are valid input, and
//! invariant violations are repaired where they are detected.

use thiserror::Error;

/// Result type for Plasmo operations.
pub type Result<T> = std::result::Result<T, PlasmoError>;

/// Errors that can occur during Plasmo operations.
#[derive(Error, Debug)]
pub enum PlasmoError {
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A saved session could not be restored.
    #[error("Session error: {0}")]
    Session(String),
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

// Convenience constructors
impl PlasmoError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlasmoError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        PlasmoError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    /// Whether this error was caused by invalid configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, PlasmoError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_render_field_and_bounds() {
        let err = PlasmoError::out_of_range("initial_connectivity", 0.0, 1.0, 1.5);
        assert!(err.is_config());
        let msg = err.to_string();
        assert!(msg.contains("initial_connectivity"), "{}", msg);
        assert!(msg.contains("1.5"), "{}", msg);
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PlasmoError = io.into();
        assert!(!err.is_config());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
