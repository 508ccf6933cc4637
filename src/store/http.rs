use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ModelKeyError, SubmitError};
use crate::form::SubmissionPayload;
use crate::registry::ProviderKey;
use crate::store::{Ack, CredentialSink};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct CredentialsBody<'a> {
    config: &'a SubmissionPayload,
}

/// Sends credentials to the workspace backend, which validates them against
/// the provider before storing.
pub struct HttpCredentialSink {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpCredentialSink {
    pub fn new(base_url: Url, api_token: Option<String>) -> Result<Self, ModelKeyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelKeyError::ConfigurationError(e.to_string()))?;

        Ok(Self::with_client(client, base_url, api_token))
    }

    pub fn with_client(client: Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_token,
        }
    }

    pub fn endpoint(&self, provider: ProviderKey) -> Result<Url, SubmitError> {
        let url = format!(
            "{}/workspaces/current/model-providers/{}",
            self.base_url.as_str().trim_end_matches('/'),
            provider
        );
        Url::parse(&url).map_err(|e| SubmitError::new(e.to_string()))
    }
}

/// The server's `message` field if it sent one, the status line otherwise.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl CredentialSink for HttpCredentialSink {
    async fn submit_credentials(
        &self,
        provider: ProviderKey,
        payload: &SubmissionPayload,
    ) -> Result<Ack, SubmitError> {
        let url = self.endpoint(provider)?;

        let mut request = self
            .client
            .post(url.clone())
            .json(&CredentialsBody { config: payload });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::new(format!("could not reach {}: {}", self.base_url, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ack {
                saved_to: url.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(provider = %provider, status = %status, "backend rejected credentials");
        Err(SubmitError::new(error_message(status, &body)))
    }
}
