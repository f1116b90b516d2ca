//! Process settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::gateway::AgentDirectory;

/// Default agent service endpoint.
pub const DEFAULT_AGENT_URL: &str = "http://localhost:3000/api/agent";

/// Runtime configuration for the binary.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Agent service endpoint.
    pub agent_url: String,
    /// Optional bearer key for the agent service.
    pub api_key: Option<SecretString>,
    /// Directory holding the config slot, exports, and logs.
    pub data_dir: PathBuf,
    /// HTTP timeout for one agent call.
    pub request_timeout: Duration,
    /// Agent ids, defaults overridable per agent.
    pub agents: AgentDirectory,
}

impl RuntimeConfig {
    /// Build from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let agent_url = var("DAY_PREP_AGENT_URL").unwrap_or_else(|| DEFAULT_AGENT_URL.to_string());
        let api_key = var("DAY_PREP_API_KEY").map(SecretString::from);

        let data_dir = var("DAY_PREP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = var("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home).join(".day-prep")
            });

        let timeout_secs: u64 = var("DAY_PREP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        let defaults = AgentDirectory::default();
        let agent = |name: &str, default: String| {
            var(&format!("DAY_PREP_AGENT_{name}")).unwrap_or(default)
        };
        let agents = AgentDirectory {
            coordinator: agent("COORDINATOR", defaults.coordinator),
            calendar: agent("CALENDAR", defaults.calendar),
            apollo: agent("APOLLO", defaults.apollo),
            linkedin: agent("LINKEDIN", defaults.linkedin),
            web_research: agent("WEB_RESEARCH", defaults.web_research),
            sports: agent("SPORTS", defaults.sports),
            connections: agent("CONNECTIONS", defaults.connections),
            email_composer: agent("EMAIL_COMPOSER", defaults.email_composer),
        };

        Self {
            agent_url,
            api_key,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            agents,
        }
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
