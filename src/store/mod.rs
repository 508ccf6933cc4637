//! Where submitted credentials go.

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::form::SubmissionPayload;
use crate::registry::ProviderKey;

mod file;
mod http;

pub use file::{FileCredentialStore, CREDENTIALS_FILE};
pub use http::HttpCredentialSink;

/// Acknowledgement from a sink that the credentials were stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Human readable location (file path or endpoint URL).
    pub saved_to: String,
}

/// Persists the credentials for one provider.
///
/// Timeouts and retries are the sink's business; the form engine treats any
/// error as a failed submit and shows its message as is.
#[async_trait]
pub trait CredentialSink: Send + Sync {
    async fn submit_credentials(
        &self,
        provider: ProviderKey,
        payload: &SubmissionPayload,
    ) -> Result<Ack, SubmitError>;
}

/// Masks a stored secret for display: first 6 and last 2 characters kept.
pub fn obfuscate_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "*".repeat(20);
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
