//! Messages sent to the agents.

use chrono::NaiveDate;

use crate::config::DayPlannerConfig;

const NOT_SPECIFIED: &str = "Not specified";

/// `Monday, March 2, 2026` for a `YYYY-MM-DD` date; unparseable input is returned as-is.
pub fn readable_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

/// Coordinator request for a full day brief.
pub fn coordinator_message(config: &DayPlannerConfig) -> String {
    let date = &config.selected_date;
    let domains = &config.company_domains;
    format!(
        "\
Generate a day prep preview for {readable} ({date}) with the following settings:

Company domains to filter OUT (these are internal): {domains}
Email recipient: {recipient}
LinkedIn URL: {linkedin}
Previous companies: {previous}
Hometown: {hometown}
Research preferences: Apollo={apollo}, LinkedIn={linkedin_on}, News={news}, Sports={sports}, Connections={connections}

IMPORTANT: Please retrieve ALL calendar events for {date}. Filter to show ONLY meetings that have \
external participants (participants whose email domains do NOT match: {domains}). For each meeting \
with external participants, provide detailed research on those external participants only.",
        readable = readable_date(date),
        recipient = or_unspecified(&config.email_recipient),
        linkedin = or_unspecified(&config.linkedin_url),
        previous = or_unspecified(&config.previous_companies),
        hometown = or_unspecified(&config.hometown),
        apollo = config.enable_apollo,
        linkedin_on = config.enable_linkedin,
        news = config.enable_news,
        sports = config.enable_sports,
        connections = config.enable_connections,
    )
}

/// Ask the profile agent for the rep's former employers.
pub fn previous_companies_message(profile_url: &str) -> String {
    format!(
        "\
Research this LinkedIn profile and extract the previous companies this person has worked at: {profile_url}

Please return a list of previous company names (not including current company) as a comma-separated string."
    )
}

/// Ask the calendar agent for one day's events.
pub fn calendar_probe_message(date: &str) -> String {
    format!(
        "Please fetch ALL calendar events for {date}. Return the complete list of meetings including all participants."
    )
}
