//! Error types shared across the workspace.
//!
//! Retrieval failures never surface here: the scanner crate reports them in
//! its search outcome. These types cover bad input and bad configuration.

use thiserror::Error;

/// Errors raised before any request is made.
#[derive(Error, Debug)]
pub enum JobScoutError {
    /// The configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A search input violates a constraint
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending input
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl JobScoutError {
    /// Shorthand for a [`JobScoutError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors from reading, writing or checking the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory to derive the config location from
    #[error("no config directory available on this platform")]
    NoConfigDir,

    /// An explicitly requested config file does not exist
    #[error("no config file at {path}")]
    NotFound {
        /// Requested location
        path: String,
    },

    /// The file is not valid TOML for [`crate::AppConfig`]
    #[error("malformed config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("could not render config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Reading or writing the file failed
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A setting is out of range or conflicts with another
    #[error("{field} {reason}")]
    InvalidValue {
        /// Dotted setting path, e.g. `pacing.politeness_min_ms`
        field: String,
        /// Constraint that was violated
        reason: String,
    },
}

/// Result alias for input and setup failures.
pub type Result<T> = std::result::Result<T, JobScoutError>;

/// Result alias for config file handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = JobScoutError::validation("location", "must not be blank");
        assert_eq!(err.to_string(), "invalid location: must not be blank");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::InvalidValue {
            field: "pacing.max_consecutive_failures".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pacing.max_consecutive_failures must be at least 1"
        );
    }

    #[test]
    fn test_config_error_wraps() {
        let err: JobScoutError = ConfigError::NoConfigDir.into();
        assert!(matches!(err, JobScoutError::Config(ConfigError::NoConfigDir)));
        assert!(err.to_string().starts_with("configuration error"));
    }
}
