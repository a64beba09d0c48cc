//! Error types and handling for `parkcast`

use thiserror::Error;

/// Main error type for the `parkcast` application
#[derive(Error, Debug)]
pub enum ParkcastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// A remote payload did not have the expected shape
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ParkcastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ParkcastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ParkcastError::Api { .. } => {
                "Unable to reach the park or weather services. Please check your internet connection."
                    .to_string()
            }
            ParkcastError::Parse { .. } | ParkcastError::Json { .. } => {
                "Received data in an unexpected format from a remote service.".to_string()
            }
            ParkcastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ParkcastError::Cache { .. } => {
                "Cache operation failed. You may need to delete the cache file.".to_string()
            }
            ParkcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
