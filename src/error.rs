//! Error types and handling for the Tripwise application

use thiserror::Error;

/// Main error type for the Tripwise application
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream text-generation errors (network, auth, quota, malformed request)
    #[error("Generation error: {message}")]
    Generation { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Response tabulation errors (model reply did not match the expected shape)
    #[error("Tabulation error: {message}")]
    Tabulation { message: String },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new tabulation error
    pub fn tabulation<S: Into<String>>(message: S) -> Self {
        Self::Tabulation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            PlannerError::Generation { message } => {
                format!("An error occurred: {message}")
            }
            PlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PlannerError::Tabulation { .. } => {
                "Error processing data or creating charts. The model reply did not contain a readable travel table."
                    .to_string()
            }
            PlannerError::General { message } => message.clone(),
        }
    }
}
