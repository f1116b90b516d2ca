//! Meeting extraction from coordinator results of variable shape.
//!
//! Strategies are tried in a fixed order and the first non-empty list
//! wins; lists from different strategies are never merged. Supporting a new
//! upstream shape means appending one function to [`STRATEGIES`].

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::model::Meeting;
use super::probe;
use crate::gateway::AgentEnvelope;

/// Substring identifying the calendar sub-agent by name.
pub const CALENDAR_AGENT_MARKER: &str = "Calendar";

/// Where the meetings were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingSource {
    /// `final_output.calendar.meetings`
    FinalOutput,
    /// `sub_agent_results[<calendar>].output.meetings`
    CalendarAgentOutput,
    /// `sub_agent_results[<calendar>].result.meetings`
    CalendarAgentResult,
    /// top-level `meetings`
    TopLevel,
}

/// An extraction strategy: the meetings at one known location, if any.
pub type Strategy = fn(&Value) -> Option<Vec<Meeting>>;

/// All strategies, in priority order.
pub const STRATEGIES: &[(MeetingSource, Strategy)] = &[
    (MeetingSource::FinalOutput, from_final_output),
    (MeetingSource::CalendarAgentOutput, from_calendar_agent_output),
    (MeetingSource::CalendarAgentResult, from_calendar_agent_result),
    (MeetingSource::TopLevel, from_top_level),
];

/// Result of normalizing one coordinator call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    pub meetings: Vec<Meeting>,
    /// Set only when the envelope itself reported failure.
    pub error: Option<String>,
    /// Which strategy matched; `None` for errors and meeting-free days.
    pub source: Option<MeetingSource>,
}

impl Normalized {
    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Normalize an agent envelope into meetings.
///
/// A failed envelope yields no meetings and its message verbatim. A
/// successful one with nothing calendar-shaped yields no meetings and no
/// error. Never panics or fails on unexpected structure.
pub fn normalize(envelope: &AgentEnvelope) -> Normalized {
    if let Some(message) = envelope.failure_message() {
        warn!(error = %message, "Coordinator reported failure");
        return Normalized::failed(message);
    }

    match envelope.response.result.as_ref() {
        Some(result) => extract_meetings(result),
        None => {
            debug!("Coordinator succeeded without a result payload");
            Normalized::default()
        }
    }
}

/// Run the strategies over a raw result, first match wins.
pub fn extract_meetings(result: &Value) -> Normalized {
    for (source, strategy) in STRATEGIES {
        if let Some(meetings) = strategy(result) {
            info!(source = ?source, count = meetings.len(), "Meetings extracted");
            return Normalized {
                meetings,
                error: None,
                source: Some(*source),
            };
        }
    }

    info!("No meetings found in coordinator result");
    Normalized::default()
}

pub fn from_final_output(result: &Value) -> Option<Vec<Meeting>> {
    decode_meetings(probe::at(result, &["final_output", "calendar", "meetings"]))
}

pub fn from_calendar_agent_output(result: &Value) -> Option<Vec<Meeting>> {
    let agent = calendar_agent(result)?;
    decode_meetings(probe::at(agent, &["output", "meetings"]))
}

pub fn from_calendar_agent_result(result: &Value) -> Option<Vec<Meeting>> {
    let agent = calendar_agent(result)?;
    decode_meetings(probe::at(agent, &["result", "meetings"]))
}

pub fn from_top_level(result: &Value) -> Option<Vec<Meeting>> {
    decode_meetings(result.get("meetings"))
}

/// The first sub-agent entry named like the calendar agent.
fn calendar_agent(result: &Value) -> Option<&Value> {
    probe::find_sub_agent(result, |name| name.contains(CALENDAR_AGENT_MARKER))
}

/// Decode a meetings list; `None` unless at least one meeting decodes.
fn decode_meetings(node: Option<&Value>) -> Option<Vec<Meeting>> {
    let items = probe::non_empty_array(node)?;
    let meetings: Vec<Meeting> = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Meeting>(item.clone()) {
            Ok(meeting) => Some(meeting),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable meeting");
                None
            }
        })
        .collect();
    (!meetings.is_empty()).then_some(meetings)
}
