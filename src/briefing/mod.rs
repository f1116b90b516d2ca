//! Day brief assembly from coordinator results.
//!
//! Pure functions only: the same envelope always produces the same brief.

pub mod email;
pub mod enrich;
mod lenient;
pub mod model;
pub mod normalize;
pub(crate) mod probe;

pub use email::email_content;
pub use enrich::{EnrichmentSource, ParticipantMap, aggregate};
pub use model::{EnrichedParticipant, ExternalParticipant, Meeting};
pub use normalize::{MeetingSource, Normalized, normalize};

use serde::Serialize;

use crate::gateway::AgentEnvelope;

/// Everything extracted from one coordinator call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBrief {
    pub meetings: Vec<Meeting>,
    pub participants: ParticipantMap,
    pub email_content: String,
    /// Which strategy found the meetings.
    pub meeting_source: Option<MeetingSource>,
    /// Set when the envelope reported failure; the brief is then empty.
    pub error: Option<String>,
}

impl DayBrief {
    /// Build a brief from an envelope.
    ///
    /// Enrichment and email extraction run only on successful envelopes.
    pub fn from_envelope(envelope: &AgentEnvelope) -> Self {
        let normalized = normalize(envelope);
        if normalized.is_error() {
            return Self {
                error: normalized.error,
                ..Default::default()
            };
        }

        let (participants, email_content) = match envelope.response.result.as_ref() {
            Some(result) => (aggregate(result), email_content(result)),
            None => (ParticipantMap::new(), email::DEFAULT_EMAIL_CONTENT.to_string()),
        };

        Self {
            meetings: normalized.meetings,
            participants,
            email_content,
            meeting_source: normalized.source,
            error: None,
        }
    }

    /// Participants of a meeting with their enrichment, in meeting order.
    ///
    /// Participants nobody enriched come back as `None`.
    pub fn participants_for<'a>(
        &'a self,
        meeting: &'a Meeting,
    ) -> impl Iterator<Item = (&'a ExternalParticipant, Option<&'a EnrichedParticipant>)> + 'a {
        meeting
            .external_participants
            .iter()
            .map(|p| (p, self.participants.get(&p.email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coordinator_result() -> serde_json::Value {
        json!({
            "final_output": {
                "calendar": {"meetings": [{
                    "meeting_title": "Acme renewal",
                    "meeting_time": "2:00 PM",
                    "duration_minutes": 60,
                    "attendees": ["rep@company.com", "jane@acme.com", "sam@acme.com"],
                    "external_participants": [
                        {"email": "jane@acme.com", "name": "Jane"},
                        {"email": "sam@acme.com", "name": "Sam"}
                    ]
                }]},
                "apollo": {"enriched_contacts": [{"email": "jane@acme.com", "name": "Jane", "title": "CFO"}]},
                "email": {"response": "Prep email"}
            }
        })
    }

    #[test]
    fn builds_full_brief() {
        let brief = DayBrief::from_envelope(&AgentEnvelope::success(coordinator_result()));
        assert_eq!(brief.meetings.len(), 1);
        assert_eq!(brief.participants.len(), 1);
        assert_eq!(brief.email_content, "Prep email");
        assert_eq!(brief.meeting_source, Some(MeetingSource::FinalOutput));
        assert!(brief.error.is_none());
    }

    #[test]
    fn participants_for_joins_enrichment() {
        let brief = DayBrief::from_envelope(&AgentEnvelope::success(coordinator_result()));
        let joined: Vec<_> = brief.participants_for(&brief.meetings[0]).collect();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].1.unwrap().apollo_data.as_ref().unwrap().title, "CFO");
        assert!(joined[1].1.is_none());
    }

    #[test]
    fn padded_email_still_joins_enrichment() {
        let result = json!({
            "meetings": [{
                "meeting_title": "Padded",
                "external_participants": [{"email": "jane@acme.com ", "name": "Jane"}]
            }],
            "final_output": {
                "apollo": {"enriched_contacts": [{"email": "jane@acme.com ", "title": "CFO"}]}
            }
        });
        let brief = DayBrief::from_envelope(&AgentEnvelope::success(result));
        assert!(brief.participants.contains_key("jane@acme.com "));
        let joined: Vec<_> = brief.participants_for(&brief.meetings[0]).collect();
        assert!(joined[0].1.is_some());
    }

    #[test]
    fn failed_envelope_gives_empty_brief_with_error() {
        let brief = DayBrief::from_envelope(&AgentEnvelope::failure("boom"));
        assert!(brief.meetings.is_empty());
        assert!(brief.participants.is_empty());
        assert_eq!(brief.error.as_deref(), Some("boom"));
    }
}
