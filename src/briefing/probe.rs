//! Path probing over untyped coordinator results.
//!
//! Every lookup returns `None` on a missing key or a node of the wrong
//! kind; nothing here fails.

use serde_json::Value;

/// Field listing per-agent results on a coordinator result.
pub const SUB_AGENT_RESULTS: &str = "sub_agent_results";
/// Field naming the agent on a sub-agent entry.
pub const AGENT_NAME: &str = "agent_name";

/// Walk object keys from `value`.
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.as_object()?.get(*key))
}

/// The node as a non-empty array.
pub fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value?.as_array().filter(|items| !items.is_empty())
}

/// Entries of `sub_agent_results`, empty when absent or not a list.
pub fn sub_agents(result: &Value) -> &[Value] {
    result
        .get(SUB_AGENT_RESULTS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First sub-agent entry whose name satisfies `matches`.
pub fn find_sub_agent<'a>(result: &'a Value, matches: impl Fn(&str) -> bool) -> Option<&'a Value> {
    sub_agents(result).iter().find(|entry| {
        entry
            .get(AGENT_NAME)
            .and_then(Value::as_str)
            .is_some_and(&matches)
    })
}

/// The payload of a sub-agent entry: its `output`, else its `result`.
pub fn sub_agent_payload(entry: &Value) -> Option<&Value> {
    ["output", "result"]
        .iter()
        .filter_map(|key| entry.get(*key))
        .find(|payload| !payload.is_null())
}

/// First field in `fields` holding a non-blank string, returned verbatim.
pub fn first_text<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| record.get(*field).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}
