//! Day brief data model: meetings, participants, and per-source enrichment records.
//!
//! Field names follow the agents' wire format (snake_case). Every field is
//! optional on the wire; decoding uses the forgiving helpers in `lenient`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

// ── Calendar ────────────────────────────────────────────────────────

/// A meeting participant outside the rep's company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalParticipant {
    /// Identity key, compared as an opaque string.
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

/// One meeting on the selected day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meeting {
    #[serde(rename = "meeting_title", alias = "title", deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "meeting_time", alias = "time", deserialize_with = "lenient::string")]
    pub time: String,
    #[serde(deserialize_with = "lenient::minutes")]
    pub duration_minutes: u32,
    /// Everyone invited, informational only.
    #[serde(deserialize_with = "lenient::string_list")]
    pub attendees: Vec<String>,
    /// The participants enrichment is keyed on.
    #[serde(deserialize_with = "lenient::list")]
    pub external_participants: Vec<ExternalParticipant>,
}

// ── Company / contact enrichment ────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApolloCompany {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient::string")]
    pub size: String,
    #[serde(deserialize_with = "lenient::string")]
    pub funding_stage: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApolloContact {
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub seniority: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub company: ApolloCompany,
}

// ── Professional profile ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient::string")]
    pub school: String,
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInProfile {
    /// Usually absent; records are then keyed by `profile_url`.
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub profile_url: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub recent_posts: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub recent_announcements: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub hobbies: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub mutual_connections: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub previous_companies: Vec<String>,
}

// ── Sports ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportsResult {
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub opponent: String,
    #[serde(deserialize_with = "lenient::string")]
    pub score: String,
    #[serde(deserialize_with = "lenient::string")]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportsTeam {
    #[serde(deserialize_with = "lenient::string")]
    pub team_name: String,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub recent_results: Vec<SportsResult>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub current_record: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportsIntel {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub person_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub hometown: String,
    #[serde(deserialize_with = "lenient::string")]
    pub college: String,
    #[serde(deserialize_with = "lenient::list")]
    pub professional_teams: Vec<SportsTeam>,
    #[serde(deserialize_with = "lenient::list")]
    pub college_teams: Vec<SportsTeam>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub conversation_starters: Vec<String>,
}

// ── Relationships ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutualConnection {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub relationship_to_rep: String,
    #[serde(deserialize_with = "lenient::string")]
    pub relationship_to_prospect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlappingCompany {
    #[serde(deserialize_with = "lenient::string")]
    pub company_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub rep_tenure: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prospect_tenure: String,
    #[serde(deserialize_with = "lenient::string")]
    pub overlap_period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedEducation {
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub rep_details: String,
    #[serde(deserialize_with = "lenient::string")]
    pub prospect_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionAnalysis {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub prospect_name: String,
    #[serde(deserialize_with = "lenient::list")]
    pub mutual_connections: Vec<MutualConnection>,
    #[serde(deserialize_with = "lenient::list")]
    pub overlapping_companies: Vec<OverlappingCompany>,
    #[serde(deserialize_with = "lenient::list")]
    pub shared_education: Vec<SharedEducation>,
    #[serde(deserialize_with = "lenient::string")]
    pub connection_strength: String,
    #[serde(deserialize_with = "lenient::string")]
    pub recommended_approach: String,
}

// ── Merged participant ──────────────────────────────────────────────

/// One participant with everything the enrichment sources know about them.
///
/// Each source owns exactly one optional field; a participant with no
/// enrichment at all is still a valid record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedParticipant {
    /// The identity key: an email, or a profile URL for profile-only records.
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apollo_data: Option<ApolloContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_profile: Option<LinkedInProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_items: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_intel: Option<SportsIntel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_analysis: Option<ConnectionAnalysis>,
}

impl EnrichedParticipant {
    /// A sparse record with no enrichment yet.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: key.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// How many sources have contributed to this record.
    pub fn source_count(&self) -> usize {
        [
            self.apollo_data.is_some(),
            self.professional_profile.is_some(),
            self.news_items.is_some(),
            self.sports_intel.is_some(),
            self.connection_analysis.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}
