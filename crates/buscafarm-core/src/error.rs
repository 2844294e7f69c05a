use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum SessionError {
    /// The sign-in call failed: rejected credentials, unreachable server,
    /// or a response the client could not use.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] ApiError),

    /// The session accessor was used outside a provider scope.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A persisted record is present but is not valid JSON for its type.
    #[error("Stored value for {key} could not be parsed: {source}")]
    Deserialization {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl SessionError {
    /// True when the backend refused the email/password pair
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, SessionError::Authentication(ApiError::Unauthorized))
    }
}
