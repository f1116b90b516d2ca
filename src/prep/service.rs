//! Prep service: drives one agent call per user action.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::prompts;
use crate::briefing::{self, DayBrief, Normalized};
use crate::config::{ConfigStore, DayPlannerConfig};
use crate::error::PrepError;
use crate::gateway::{AgentDirectory, AgentGateway};
use crate::history::{HistoryEntry, HistoryLog, PreviewOutcome};

/// What one preview attempt produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub brief: DayBrief,
    /// The history entry recorded for this attempt.
    pub entry: HistoryEntry,
    /// The raw envelope, kept for debugging; `None` when the call never completed.
    pub raw: Option<Value>,
}

impl PreviewReport {
    pub fn is_failure(&self) -> bool {
        self.brief.error.is_some()
    }
}

/// Orchestrates config, gateway, briefing, and history.
pub struct PrepService {
    config: Arc<ConfigStore>,
    gateway: Arc<dyn AgentGateway>,
    history: Arc<HistoryLog>,
    agents: AgentDirectory,
}

impl PrepService {
    pub fn new(
        config: Arc<ConfigStore>,
        gateway: Arc<dyn AgentGateway>,
        history: Arc<HistoryLog>,
        agents: AgentDirectory,
    ) -> Self {
        Self {
            config,
            gateway,
            history,
            agents,
        }
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn history(&self) -> &Arc<HistoryLog> {
        &self.history
    }

    /// Generate the day brief for the configured date.
    ///
    /// Never fails: transport and agent errors become a failed history entry
    /// and a report whose brief carries the message.
    pub async fn generate_preview(&self) -> PreviewReport {
        let config = self.config.current().await;
        let message = prompts::coordinator_message(&config);
        info!(date = %config.selected_date, "Generating day prep preview");

        let (brief, raw) = match self.gateway.invoke(&message, &self.agents.coordinator).await {
            Ok(envelope) => {
                let raw = serde_json::to_value(&envelope).ok();
                (DayBrief::from_envelope(&envelope), raw)
            }
            Err(e) => {
                warn!(error = %e, "Coordinator call failed");
                let brief = DayBrief {
                    error: Some(e.message().to_string()),
                    ..Default::default()
                };
                (brief, None)
            }
        };

        let outcome = match &brief.error {
            Some(message) => PreviewOutcome::failure(message.clone()),
            None => PreviewOutcome::Success {
                meetings: brief.meetings.clone(),
                participants: brief.participants.clone(),
                email_content: brief.email_content.clone(),
            },
        };
        let entry = self.history.record(&outcome).await;

        PreviewReport { brief, entry, raw }
    }

    /// Look up the rep's former employers from their profile and store them.
    ///
    /// `Ok(None)` when the agent answered but nothing usable was found; the
    /// config is then left alone.
    pub async fn fetch_previous_companies(&self) -> Result<Option<String>, PrepError> {
        let profile_url = self.config.current().await.linkedin_url;
        if profile_url.trim().is_empty() {
            return Err(PrepError::MissingProfileUrl);
        }

        let agent_id = &self.agents.linkedin;
        let message = prompts::previous_companies_message(&profile_url);
        let result = self
            .gateway
            .invoke(&message, agent_id)
            .await?
            .into_result(agent_id)?;

        let Some(companies) = previous_companies(&result) else {
            warn!("Could not extract previous companies from profile response");
            return Ok(None);
        };

        info!(companies = %companies, "Previous companies updated");
        let stored = companies.clone();
        self.config
            .update(move |config| DayPlannerConfig {
                previous_companies: stored,
                ..config
            })
            .await;
        Ok(Some(companies))
    }

    /// Ask the calendar agent directly for the selected date's events.
    ///
    /// Useful for checking the calendar integration in isolation.
    pub async fn probe_calendar(&self) -> Result<Normalized, PrepError> {
        let date = self.config.current().await.selected_date;
        let agent_id = &self.agents.calendar;
        let message = prompts::calendar_probe_message(&date);
        let result = self
            .gateway
            .invoke(&message, agent_id)
            .await?
            .into_result(agent_id)?;

        let normalized = briefing::normalize::extract_meetings(&result);
        info!(date = %date, meetings = normalized.meetings.len(), "Calendar probe succeeded");
        Ok(normalized)
    }
}

/// Former employers from a profile agent result.
///
/// Checks `linkedin_profiles[0].previous_companies`, then a top-level
/// `previous_companies`, then free text in `text` or `response`. Lists are
/// joined with `", "`.
pub fn previous_companies(result: &Value) -> Option<String> {
    let listed = result
        .get("linkedin_profiles")
        .and_then(|profiles| profiles.get(0))
        .and_then(|profile| profile.get("previous_companies"))
        .or_else(|| result.get("previous_companies"))
        .and_then(join_companies);

    listed
        .or_else(|| briefing::probe::first_text(result, &["text", "response"]).map(str::to_string))
        .filter(|s| !s.trim().is_empty())
}

fn join_companies(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            Some(names.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::error::GatewayError;
    use crate::gateway::AgentEnvelope;
    use crate::history::HistoryStatus;
    use crate::storage::MemoryStorage;

    /// Replays canned replies and records every call.
    struct ScriptedGateway {
        reply: Mutex<Option<Result<AgentEnvelope, GatewayError>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGateway {
        fn new(reply: Result<AgentEnvelope, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AgentGateway for ScriptedGateway {
        async fn invoke(
            &self,
            message: &str,
            agent_id: &str,
        ) -> Result<AgentEnvelope, GatewayError> {
            self.calls
                .lock()
                .await
                .push((message.to_string(), agent_id.to_string()));
            self.reply
                .lock()
                .await
                .take()
                .unwrap_or_else(|| Ok(AgentEnvelope::success(json!({}))))
        }
    }

    async fn service(gateway: Arc<ScriptedGateway>) -> PrepService {
        let config = ConfigStore::open(Arc::new(MemoryStorage::new())).await;
        PrepService::new(config, gateway, HistoryLog::new(), AgentDirectory::default())
    }

    #[tokio::test]
    async fn preview_success_records_sent_entry() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::success(json!({
            "meetings": [{"meeting_title": "Sync", "external_participants": [{"email": "a@x.com", "name": "A"}]}],
            "final_output": {"email": {"response": "Hi"}}
        }))));
        let svc = service(Arc::clone(&gateway)).await;

        let report = svc.generate_preview().await;
        assert!(!report.is_failure());
        assert_eq!(report.brief.meetings.len(), 1);
        assert_eq!(report.entry.status, HistoryStatus::Sent);
        assert_eq!(report.entry.meeting_count, 1);
        assert_eq!(report.entry.content, "Hi");
        assert!(report.raw.is_some());

        let calls = gateway.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, AgentDirectory::default().coordinator);
    }

    #[tokio::test]
    async fn preview_transport_error_records_failure() {
        let gateway = ScriptedGateway::new(Err(GatewayError::Transport {
            agent_id: "c".into(),
            reason: "connection refused".into(),
        }));
        let svc = service(gateway).await;

        let report = svc.generate_preview().await;
        assert!(report.is_failure());
        assert!(report.raw.is_none());
        assert_eq!(report.entry.status, HistoryStatus::Failed);
        assert_eq!(report.entry.content, "Error: connection refused");
        assert_eq!(svc.history().len().await, 1);
    }

    #[tokio::test]
    async fn preview_agent_error_records_failure() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::failure("Calendar not connected")));
        let svc = service(gateway).await;

        let report = svc.generate_preview().await;
        assert_eq!(report.brief.error.as_deref(), Some("Calendar not connected"));
        assert_eq!(report.entry.meeting_count, 0);
        assert_eq!(report.entry.participant_count, 0);
        assert_eq!(report.entry.status, HistoryStatus::Failed);
    }

    #[tokio::test]
    async fn fetch_companies_requires_profile_url() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::success(json!({}))));
        let svc = service(Arc::clone(&gateway)).await;
        let err = svc.fetch_previous_companies().await.unwrap_err();
        assert!(matches!(err, PrepError::MissingProfileUrl));
        assert!(gateway.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_companies_updates_config() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::success(json!({
            "linkedin_profiles": [{"previous_companies": ["Globex", "Initech"]}]
        }))));
        let svc = service(Arc::clone(&gateway)).await;
        svc.config()
            .update(|c| DayPlannerConfig {
                linkedin_url: "https://linkedin.com/in/rep".into(),
                ..c
            })
            .await;

        let companies = svc.fetch_previous_companies().await.unwrap();
        assert_eq!(companies.as_deref(), Some("Globex, Initech"));
        assert_eq!(svc.config().current().await.previous_companies, "Globex, Initech");
        assert_eq!(gateway.calls.lock().await[0].1, AgentDirectory::default().linkedin);
    }

    #[tokio::test]
    async fn fetch_companies_agent_failure_is_error() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::failure("profile private")));
        let svc = service(gateway).await;
        svc.config()
            .update(|c| DayPlannerConfig {
                linkedin_url: "https://linkedin.com/in/rep".into(),
                previous_companies: "Kept".into(),
                ..c
            })
            .await;

        let err = svc.fetch_previous_companies().await.unwrap_err();
        assert!(matches!(err, PrepError::Gateway(GatewayError::Agent { .. })));
        assert_eq!(svc.config().current().await.previous_companies, "Kept");
    }

    #[tokio::test]
    async fn probe_calendar_reports_agent_error() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::failure("token expired")));
        let svc = service(Arc::clone(&gateway)).await;
        match svc.probe_calendar().await {
            Err(PrepError::Gateway(e)) => assert_eq!(e.message(), "token expired"),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(gateway.calls.lock().await[0].1, AgentDirectory::default().calendar);
    }

    #[tokio::test]
    async fn probe_calendar_extracts_meetings() {
        let gateway = ScriptedGateway::new(Ok(AgentEnvelope::success(json!({
            "meetings": [{"meeting_title": "Standup"}]
        }))));
        let svc = service(gateway).await;
        let normalized = svc.probe_calendar().await.unwrap();
        assert_eq!(normalized.meetings.len(), 1);
    }

    #[test]
    fn previous_companies_fallbacks() {
        assert_eq!(
            previous_companies(&json!({"previous_companies": "Acme, Globex"})).as_deref(),
            Some("Acme, Globex")
        );
        assert_eq!(
            previous_companies(&json!({"response": "Acme and Globex"})).as_deref(),
            Some("Acme and Globex")
        );
        assert_eq!(previous_companies(&json!({"linkedin_profiles": []})), None);
        assert_eq!(previous_companies(&json!({"previous_companies": []})), None);
    }
}
