//! HTTP gateway: posts agent calls to the service endpoint with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

use super::{AgentEnvelope, AgentGateway};
use crate::error::GatewayError;

/// Request body for one agent call.
#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
}

/// reqwest-backed `AgentGateway`.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl HttpGateway {
    /// Create a gateway posting to `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                agent_id: String::new(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        info!(endpoint = %endpoint, "Agent gateway configured");
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentGateway for HttpGateway {
    async fn invoke(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError> {
        let transport = |reason: String| GatewayError::Transport {
            agent_id: agent_id.to_string(),
            reason,
        };

        debug!(agent_id, message_len = message.len(), "Invoking agent");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&InvokeRequest { message, agent_id });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(transport(format!("HTTP {status}: {snippet}")));
        }

        let envelope: AgentEnvelope = response
            .json()
            .await
            .map_err(|e| transport(format!("Invalid response body: {e}")))?;

        debug!(agent_id, success = envelope.is_success(), "Agent responded");
        Ok(envelope)
    }
}
