//! Client errors

use thiserror::Error;

/// Everything that can go wrong between credentials and a secret list
#[derive(Error, Debug)]
pub enum ClientError {
    /// A region rejected the credentials or could not be reached. After a
    /// full fallback pass this names the last region attempted.
    #[error("Authentication failed ({region} region): {status_text}")]
    Authentication { region: String, status_text: String },

    /// A response did not have the expected shape
    #[error("Unexpected response from Infisical: {0}")]
    SchemaValidation(String),

    /// The secret listing call did not succeed
    #[error("Failed to fetch secrets: {status_text}")]
    Fetch { status_text: String },

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("No regions configured")]
    NoRegions,
}

impl ClientError {
    /// Region named by an authentication failure
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Authentication { region, .. } => Some(region),
            _ => None,
        }
    }
}
