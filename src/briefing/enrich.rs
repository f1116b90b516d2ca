//! Participant aggregation across enrichment sources.
//!
//! Each source contributes a list of per-person records. Records are folded
//! into a map keyed by identity with [`apply`], one source at a time in
//! [`EnrichmentSource::ORDER`]. Every source writes its own field only, so
//! later sources never erase earlier ones.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::model::EnrichedParticipant;
use super::probe;

/// Merged participants by identity key, ordered for reproducible snapshots.
pub type ParticipantMap = BTreeMap<String, EnrichedParticipant>;

/// Fields that may carry a record's email, in preference order.
pub const EMAIL_FIELDS: &[&str] = &[
    "email",
    "participant_email",
    "person_email",
    "contact_email",
    "prospect_email",
];

/// Fields that may carry a profile URL (professional-profile records only).
pub const PROFILE_URL_FIELDS: &[&str] = &["profile_url", "linkedin_url"];

/// Fields that may carry a display name.
pub const NAME_FIELDS: &[&str] = &["name", "person_name", "prospect_name", "full_name"];

/// An independent enrichment data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
    /// Company/contact enrichment.
    Apollo,
    /// Professional-profile research.
    LinkedIn,
    /// News / web research.
    News,
    /// Sports intelligence.
    Sports,
    /// Relationship / connection analysis.
    Connections,
}

impl EnrichmentSource {
    /// Processing order. Fixed so merged snapshots are reproducible.
    pub const ORDER: [Self; 5] = [
        Self::Apollo,
        Self::LinkedIn,
        Self::News,
        Self::Sports,
        Self::Connections,
    ];

    /// Keys under `final_output` where this source's payload may live.
    pub fn output_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Apollo => &["apollo"],
            Self::LinkedIn => &["linkedin"],
            Self::News => &["news", "web_research"],
            Self::Sports => &["sports"],
            Self::Connections => &["connections"],
        }
    }

    /// Substring identifying this source's sub-agent by name.
    pub fn agent_marker(&self) -> &'static str {
        match self {
            Self::Apollo => "Apollo",
            Self::LinkedIn => "LinkedIn",
            Self::News => "Web Research",
            Self::Sports => "Sports",
            Self::Connections => "Connection",
        }
    }

    /// Field of the payload holding the per-person records.
    pub fn records_field(&self) -> &'static str {
        match self {
            Self::Apollo => "enriched_contacts",
            Self::LinkedIn => "linkedin_profiles",
            Self::News => "research_findings",
            Self::Sports => "sports_intel",
            Self::Connections => "connection_analysis",
        }
    }

    /// Only profile records may be keyed by profile URL; they often lack an email.
    pub fn keys_by_profile_url(&self) -> bool {
        matches!(self, Self::LinkedIn)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Apollo => "apollo",
            Self::LinkedIn => "linkedin",
            Self::News => "news",
            Self::Sports => "sports",
            Self::Connections => "connections",
        }
    }
}

impl std::fmt::Display for EnrichmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Build the participant map from a coordinator result.
pub fn aggregate(result: &Value) -> ParticipantMap {
    let map = EnrichmentSource::ORDER
        .iter()
        .fold(ParticipantMap::new(), |map, source| {
            source_records(result, *source)
                .iter()
                .fold(map, |map, record| apply(map, *source, record))
        });
    info!(participants = map.len(), "Participants aggregated");
    map
}

/// The payload a source contributed: `final_output.<key>`, else its sub-agent's output.
pub fn source_payload(result: &Value, source: EnrichmentSource) -> Option<&Value> {
    let from_final = source
        .output_keys()
        .iter()
        .find_map(|key| probe::at(result, &["final_output", *key]));
    from_final.or_else(|| {
        let marker = source.agent_marker();
        probe::find_sub_agent(result, |name| name.contains(marker))
            .and_then(probe::sub_agent_payload)
    })
}

/// The per-person records of a source, empty when it contributed nothing.
pub fn source_records(result: &Value, source: EnrichmentSource) -> &[Value] {
    let Some(payload) = source_payload(result, source) else {
        return &[];
    };
    let records = payload.get(source.records_field()).unwrap_or(payload);
    records.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Identity key for a record: an email-like field, else (profiles only) a profile URL.
pub fn identity_key(source: EnrichmentSource, record: &Value) -> Option<String> {
    probe::first_text(record, EMAIL_FIELDS)
        .or_else(|| {
            source
                .keys_by_profile_url()
                .then(|| probe::first_text(record, PROFILE_URL_FIELDS))
                .flatten()
        })
        .map(str::to_string)
}

/// Fold one source record into the map.
///
/// Looks up or creates the participant for the record's key and sets the
/// field owned by `source`. Fields from other sources are left as they are.
/// Within one source a later record for the same key replaces the field,
/// except news, whose items accumulate in order.
pub fn apply(mut map: ParticipantMap, source: EnrichmentSource, record: &Value) -> ParticipantMap {
    let Some(key) = identity_key(source, record) else {
        debug!(source = %source, "Skipping enrichment record without identity");
        return map;
    };
    let name = probe::first_text(record, NAME_FIELDS).unwrap_or_default();

    let participant = map
        .entry(key.clone())
        .or_insert_with(|| EnrichedParticipant::new(key.as_str(), name));
    if participant.name.is_empty() && !name.is_empty() {
        participant.name = name.to_string();
    }

    match source {
        EnrichmentSource::Apollo => {
            if let Some(contact) = decode(source, &key, record) {
                participant.apollo_data = Some(contact);
            }
        }
        EnrichmentSource::LinkedIn => {
            if let Some(profile) = decode(source, &key, record) {
                participant.professional_profile = Some(profile);
            }
        }
        EnrichmentSource::News => {
            participant
                .news_items
                .get_or_insert_with(Vec::new)
                .push(record.clone());
        }
        EnrichmentSource::Sports => {
            if let Some(intel) = decode(source, &key, record) {
                participant.sports_intel = Some(intel);
            }
        }
        EnrichmentSource::Connections => {
            if let Some(analysis) = decode(source, &key, record) {
                participant.connection_analysis = Some(analysis);
            }
        }
    }

    map
}

fn decode<T: DeserializeOwned>(source: EnrichmentSource, key: &str, record: &Value) -> Option<T> {
    serde_json::from_value(record.clone())
        .inspect_err(|e| warn!(source = %source, key, error = %e, "Undecodable enrichment record"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn two_sources_same_email_merge() {
        let result = json!({"final_output": {
            "apollo": {"enriched_contacts": [
                {"email": "jane@acme.com", "name": "Jane Doe", "title": "VP Sales"}
            ]},
            "connections": {"connection_analysis": [
                {"email": "jane@acme.com", "prospect_name": "Jane Doe", "connection_strength": "strong"}
            ]}
        }});
        let map = aggregate(&result);
        assert_eq!(map.len(), 1);
        let jane = &map["jane@acme.com"];
        assert_eq!(jane.apollo_data.as_ref().unwrap().title, "VP Sales");
        assert_eq!(
            jane.connection_analysis.as_ref().unwrap().connection_strength,
            "strong"
        );
        assert_eq!(jane.source_count(), 2);
    }

    #[test]
    fn profile_without_email_keyed_by_url() {
        let result = json!({"final_output": {
            "apollo": {"enriched_contacts": [{"email": "jane@acme.com", "name": "Jane Doe"}]},
            "linkedin": {"linkedin_profiles": [
                {"name": "Jane Doe", "profile_url": "https://linkedin.com/in/janedoe"}
            ]}
        }});
        let map = aggregate(&result);
        assert_eq!(map.len(), 2);

        let by_email = &map["jane@acme.com"];
        assert!(by_email.apollo_data.is_some());
        assert!(by_email.professional_profile.is_none());

        let by_url = &map["https://linkedin.com/in/janedoe"];
        assert_eq!(by_url.email, "https://linkedin.com/in/janedoe");
        assert!(by_url.professional_profile.is_some());
        assert!(by_url.apollo_data.is_none());
    }

    #[test]
    fn profile_with_email_merges_into_email_record() {
        let result = json!({"final_output": {
            "apollo": {"enriched_contacts": [{"email": "jane@acme.com", "name": "Jane"}]},
            "linkedin": {"linkedin_profiles": [
                {"email": "jane@acme.com", "name": "Jane", "profile_url": "https://linkedin.com/in/j"}
            ]}
        }});
        let map = aggregate(&result);
        assert_eq!(map.len(), 1);
        assert_eq!(map["jane@acme.com"].source_count(), 2);
    }

    #[test]
    fn only_profiles_fall_back_to_url() {
        let record = json!({"person_name": "Bob", "profile_url": "https://linkedin.com/in/bob"});
        assert!(identity_key(EnrichmentSource::Sports, &record).is_none());
        assert_eq!(
            identity_key(EnrichmentSource::LinkedIn, &record).as_deref(),
            Some("https://linkedin.com/in/bob")
        );
    }

    #[test]
    fn email_is_opaque_and_case_sensitive() {
        let result = json!({"final_output": {"apollo": {"enriched_contacts": [
            {"email": "Jane@Acme.com"},
            {"email": "jane@acme.com"}
        ]}}});
        assert_eq!(aggregate(&result).len(), 2);
    }

    #[test]
    fn later_source_does_not_erase_earlier_fields() {
        let map = ParticipantMap::new();
        let map = apply(
            map,
            EnrichmentSource::Apollo,
            &json!({"email": "a@x.com", "name": "A", "seniority": "C-level"}),
        );
        let map = apply(
            map,
            EnrichmentSource::Sports,
            &json!({"email": "a@x.com", "person_name": "A", "college": "Duke"}),
        );
        let a = &map["a@x.com"];
        assert_eq!(a.apollo_data.as_ref().unwrap().seniority, "C-level");
        assert_eq!(a.sports_intel.as_ref().unwrap().college, "Duke");
    }

    #[test]
    fn news_items_accumulate_per_person() {
        let result = json!({"final_output": {"news": {"research_findings": [
            {"participant_email": "a@x.com", "headline": "Raised Series B"},
            {"participant_email": "b@y.com", "headline": "New CTO"},
            {"participant_email": "a@x.com", "headline": "Opened EU office"}
        ]}}});
        let map = aggregate(&result);
        let items = map["a@x.com"].news_items.as_ref().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["headline"], "Opened EU office");
        assert_eq!(map["b@y.com"].news_items.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn sub_agent_payload_used_when_final_output_missing() {
        let result = json!({"sub_agent_results": [
            {"agent_name": "Sports Intelligence Agent", "output": {"sports_intel": [
                {"email": "a@x.com", "person_name": "A", "hometown": "Boston"}
            ]}}
        ]});
        let map = aggregate(&result);
        assert_eq!(
            map["a@x.com"].sports_intel.as_ref().unwrap().hometown,
            "Boston"
        );
    }

    #[test]
    fn records_without_identity_are_skipped() {
        let result = json!({"final_output": {"sports": {"sports_intel": [
            {"person_name": "No Email"}
        ]}}});
        assert!(aggregate(&result).is_empty());
    }

    #[test]
    fn payload_may_be_a_bare_list() {
        let result = json!({"final_output": {"apollo": [{"email": "a@x.com"}]}});
        assert!(aggregate(&result)["a@x.com"].apollo_data.is_some());
    }

    #[test]
    fn odd_shapes_yield_empty_map() {
        for result in [
            json!(null),
            json!({"final_output": "text"}),
            json!({"final_output": {"apollo": {"enriched_contacts": "none"}}}),
            json!({"sub_agent_results": [{"agent_name": "Apollo", "output": 5}]}),
        ] {
            assert!(aggregate(&result).is_empty(), "unexpected participants for {result}");
        }
    }

    #[test]
    fn aggregation_is_deterministic() {
        let result = json!({"final_output": {
            "apollo": {"enriched_contacts": [{"email": "z@x.com"}, {"email": "a@x.com"}]},
            "linkedin": {"linkedin_profiles": [{"profile_url": "https://l.in/m"}]}
        }});
        let first = serde_json::to_string(&aggregate(&result)).unwrap();
        let second = serde_json::to_string(&aggregate(&result)).unwrap();
        assert_eq!(first, second);
        let keys: Vec<String> = aggregate(&result).into_keys().collect();
        assert_eq!(keys, vec!["a@x.com", "https://l.in/m", "z@x.com"]);
    }
}
