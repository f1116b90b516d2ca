//! Configuration types.
//!
//! - `DayPlannerConfig`: the user-facing settings that parameterize every
//!   agent call, persisted by `ConfigStore`
//! - `RuntimeConfig`: process settings read from the environment

pub mod runtime;
pub mod store;

pub use runtime::RuntimeConfig;
pub use store::{CONFIG_STORAGE_KEY, ConfigStore, export_file_name};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;

/// Day planner settings.
///
/// Always complete: decoding never yields a partial value, missing or
/// wrongly-typed fields take their default one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlannerConfig {
    /// Local time the morning prep runs, `HH:MM`.
    pub schedule_time: String,
    /// IANA timezone name.
    pub timezone: String,
    pub enabled: bool,
    /// Comma-separated internal domains; participants on these are not external.
    pub company_domains: String,
    pub email_recipient: String,
    /// The rep's own LinkedIn profile.
    #[serde(rename = "linkedInUrl")]
    pub linkedin_url: String,
    /// Comma-separated employers, used to find overlapping history.
    pub previous_companies: String,
    pub hometown: String,
    pub enable_apollo: bool,
    #[serde(rename = "enableLinkedIn")]
    pub enable_linkedin: bool,
    pub enable_news: bool,
    pub enable_sports: bool,
    pub enable_connections: bool,
    /// Day to prepare, `YYYY-MM-DD`.
    pub selected_date: String,
}

impl Default for DayPlannerConfig {
    fn default() -> Self {
        Self {
            schedule_time: "06:00".to_string(),
            timezone: "America/New_York".to_string(),
            enabled: true,
            company_domains: "company.com".to_string(),
            email_recipient: String::new(),
            linkedin_url: String::new(),
            previous_companies: String::new(),
            hometown: String::new(),
            enable_apollo: true,
            enable_linkedin: true,
            enable_news: true,
            enable_sports: true,
            enable_connections: true,
            selected_date: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

impl DayPlannerConfig {
    /// Decode from any JSON value, field by field.
    ///
    /// Fields present with the same JSON kind as the default are taken;
    /// everything else (absent, null, wrong kind, unknown keys) is ignored.
    /// A non-object value yields the default.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(fields) = value.as_object() else {
            debug!("Config value is not an object, using defaults");
            return defaults;
        };

        let mut merged = match serde_json::to_value(&defaults) {
            Ok(Value::Object(map)) => map,
            _ => return defaults,
        };

        for (key, slot) in merged.iter_mut() {
            match fields.get(key) {
                Some(candidate) if same_kind(slot, candidate) => *slot = candidate.clone(),
                Some(_) => debug!(field = %key, "Ignoring wrongly-typed config field"),
                None => debug!(field = %key, "Config field missing, using default"),
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
    }

    /// Parse structured text into a config.
    ///
    /// The text must be a JSON object; its fields are then decoded with
    /// [`DayPlannerConfig::from_value`].
    pub fn parse(bytes: &[u8]) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !value.is_object() {
            return Err(ConfigError::Parse("expected a JSON object".to_string()));
        }
        Ok(Self::from_value(&value))
    }

    /// Pretty-printed JSON with exactly the config fields.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_values() {
        let config = DayPlannerConfig::default();
        assert_eq!(config.schedule_time, "06:00");
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.company_domains, "company.com");
        assert!(config.enabled);
        assert!(config.enable_apollo && config.enable_sports && config.enable_connections);
        assert!(config.email_recipient.is_empty());
        assert_eq!(config.selected_date.len(), 10);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(DayPlannerConfig::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for expected in [
            "scheduleTime",
            "timezone",
            "enabled",
            "companyDomains",
            "emailRecipient",
            "linkedInUrl",
            "previousCompanies",
            "hometown",
            "enableApollo",
            "enableLinkedIn",
            "enableNews",
            "enableSports",
            "enableConnections",
            "selectedDate",
        ] {
            assert!(keys.contains(&expected), "missing key {expected}");
        }
        assert_eq!(keys.len(), 14);
    }

    #[test]
    fn partial_value_fills_defaults_per_field() {
        let config = DayPlannerConfig::from_value(&json!({
            "hometown": "Austin",
            "enableSports": false
        }));
        let defaults = DayPlannerConfig::default();
        assert_eq!(config.hometown, "Austin");
        assert!(!config.enable_sports);
        assert_eq!(config.schedule_time, defaults.schedule_time);
        assert_eq!(config.company_domains, defaults.company_domains);
        assert!(config.enable_news);
    }

    #[test]
    fn wrongly_typed_fields_fall_back() {
        let config = DayPlannerConfig::from_value(&json!({
            "enabled": "yes",
            "timezone": 5,
            "emailRecipient": null,
            "hometown": "Denver",
            "unknownField": true
        }));
        assert!(config.enabled);
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.email_recipient, "");
        assert_eq!(config.hometown, "Denver");
    }

    #[test]
    fn non_object_is_default() {
        let config = DayPlannerConfig::from_value(&json!([1, 2, 3]));
        assert_eq!(config, DayPlannerConfig::default());
    }

    #[test]
    fn parse_rejects_invalid_text_and_non_objects() {
        assert!(matches!(
            DayPlannerConfig::parse(b"not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DayPlannerConfig::parse(b"\"a string\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(DayPlannerConfig::parse(b"{}").is_ok());
    }

    #[test]
    fn pretty_json_roundtrip() {
        let config = DayPlannerConfig {
            linkedin_url: "https://linkedin.com/in/rep".into(),
            previous_companies: "Acme, Globex".into(),
            enable_news: false,
            ..Default::default()
        };
        let bytes = config.to_pretty_json().unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("\n  \""));
        assert_eq!(DayPlannerConfig::parse(&bytes).unwrap(), config);
    }
}
