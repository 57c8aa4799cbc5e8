//! Error types for the admin console

use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the membership API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The action needs a selected member
    #[error("No member selected")]
    NoSelection,

    /// The funding amount is not an integer
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
}

impl ClientError {
    /// Create an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// The text shown to the operator
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
