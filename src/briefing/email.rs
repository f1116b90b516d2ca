//! Composed prep-email text from a coordinator result.

use serde_json::Value;

use super::probe;

/// Exact name of the email composer sub-agent.
pub const EMAIL_COMPOSER_AGENT: &str = "Email Composer Agent";

/// Text used when the result carries no email at all.
pub const DEFAULT_EMAIL_CONTENT: &str = "Email preview generated successfully.";

/// Text used when an email node exists but holds no readable body.
const COMPOSER_PLACEHOLDER: &str = "Email generated by Email Composer Agent";

/// Pick the composed email out of a coordinator result.
///
/// `final_output.email` is authoritative when present; otherwise the email
/// composer sub-agent's output is used.
pub fn email_content(result: &Value) -> String {
    let email_node = probe::at(result, &["final_output", "email"]).filter(|node| !is_blank(node));
    if let Some(email) = email_node {
        return non_empty_text(email.get("response"))
            .or_else(|| non_empty_text(probe::at(email, &["data", "email_body"])))
            .unwrap_or(COMPOSER_PLACEHOLDER)
            .to_string();
    }

    let composer = probe::find_sub_agent(result, |name| name == EMAIL_COMPOSER_AGENT)
        .and_then(|entry| entry.get("output"))
        .filter(|output| !output.is_null());
    if let Some(output) = composer {
        if let Some(text) = non_empty_text(output.get("response"))
            .or_else(|| non_empty_text(output.get("email_body")))
        {
            return text.to_string();
        }
        return serde_json::to_string_pretty(output).unwrap_or_else(|_| output.to_string());
    }

    DEFAULT_EMAIL_CONTENT.to_string()
}

/// Null and empty strings count as an absent email node.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<&str> {
    value?.as_str().filter(|s| !s.trim().is_empty())
}
