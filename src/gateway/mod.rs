//! Agent gateway: the single boundary to the multi-agent service.
//!
//! `invoke(message, agent_id)` returns the service's result-or-error
//! envelope. The `result` payload is opaque here; the briefing module
//! decides how to read it.

pub mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Fallback when a failed envelope carries no message at all.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Outcome status reported inside the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Success,
    #[default]
    #[serde(other)]
    Error,
}

/// The nested `response` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result-or-error envelope returned for every agent call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: AgentResponse,
    /// Transport-level error text some deployments put next to `response`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentEnvelope {
    /// A successful envelope around `result`.
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            response: AgentResponse {
                status: AgentStatus::Success,
                result: Some(result),
                message: None,
            },
            error: None,
        }
    }

    /// A failed envelope carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: AgentResponse {
                status: AgentStatus::Error,
                result: None,
                message: Some(message.into()),
            },
            error: None,
        }
    }

    /// Both the outer flag and the nested status report success.
    pub fn is_success(&self) -> bool {
        self.success && self.response.status == AgentStatus::Success
    }

    /// The error text of a failed envelope, `None` when successful.
    pub fn failure_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        let message = self
            .response
            .message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_ERROR);
        Some(message.to_string())
    }

    /// Unwrap the result payload, turning a failed envelope into `GatewayError::Agent`.
    ///
    /// A successful envelope without a payload yields `Value::Null`.
    pub fn into_result(self, agent_id: &str) -> Result<Value, GatewayError> {
        if let Some(message) = self.failure_message() {
            return Err(GatewayError::Agent {
                agent_id: agent_id.to_string(),
                message,
            });
        }
        Ok(self.response.result.unwrap_or(Value::Null))
    }
}

/// Transport to the agent service.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Send `message` to the agent `agent_id`.
    ///
    /// `Err` only when the call could not complete; service-reported
    /// failures come back as a failed envelope.
    async fn invoke(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, GatewayError>;
}

/// Ids of the agents the prep flow talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDirectory {
    pub coordinator: String,
    pub calendar: String,
    pub apollo: String,
    pub linkedin: String,
    pub web_research: String,
    pub sports: String,
    pub connections: String,
    pub email_composer: String,
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self {
            coordinator: "69864ca97a04453a977498b9".to_string(),
            calendar: "69864be4f823535a6d0c1816".to_string(),
            apollo: "69864bfce6006e489659fdfe".to_string(),
            linkedin: "69864c12cb7e55fd6b4f4c48".to_string(),
            web_research: "69864c29f823535a6d0c1819".to_string(),
            sports: "69864c3e8a54fe39adbfb71c".to_string(),
            connections: "69864c58812c228b6df02829".to_string(),
            email_composer: "69864c727a04453a977498b8".to_string(),
        }
    }
}
