//! Error types for Day Prep.

/// Errors from the persisted/imported day planner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialization(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Key/value and blob storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the agent service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The call itself could not complete (network, HTTP status, undecodable body).
    #[error("Agent {agent_id} unreachable: {reason}")]
    Transport { agent_id: String, reason: String },

    /// The call completed but the service reported an unsuccessful outcome.
    #[error("Agent {agent_id} failed: {message}")]
    Agent { agent_id: String, message: String },
}

impl GatewayError {
    /// The human-readable message, without the agent id prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { reason, .. } => reason,
            Self::Agent { message, .. } => message,
        }
    }
}

/// Errors from prep actions that surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("No LinkedIn profile URL configured")]
    MissingProfileUrl,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_message_strips_agent_id() {
        let err = GatewayError::Agent {
            agent_id: "abc".into(),
            message: "calendar not connected".into(),
        };
        assert_eq!(err.message(), "calendar not connected");
        assert_eq!(err.to_string(), "Agent abc failed: calendar not connected");
    }
}
