//! # Patch extraction
//!
//! Finds a configuration object embedded in free assistant text. Strategies,
//! in order:
//!
//! 1. a ```` ```json ```` fenced block whose object mentions an indicator key
//! 2. any fenced block holding a JSON object
//! 3. a brace-balanced scan around the first occurrence of an anchor key
//!
//! Extraction never fails loudly; anything that does not decode to a JSON
//! object is skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Keys whose presence marks an object as configuration
pub const INDICATOR_KEYS: [&str; 14] = [
    "navGroups",
    "pageConfigs",
    "version",
    "filterArea",
    "tableArea",
    "cardArea",
    "actionsArea",
    "filters",
    "columns",
    "buttons",
    "cards",
    "navId",
    "template",
    "subItems",
];

/// Keys the unfenced scan anchors on
const ANCHOR_KEYS: [&str; 6] = [
    "navGroups",
    "pageConfigs",
    "filterArea",
    "tableArea",
    "filters",
    "columns",
];

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("json fence pattern"));
static ANY_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(\{.*?\})\s*```").expect("fence pattern")
});

/// Extract the first configuration object embedded in `text`
pub fn extract_patch(text: &str) -> Option<Value> {
    if let Some(value) = json_fence(text) {
        debug!("[Extract] Found config in json fence");
        return Some(value);
    }

    if let Some(value) = any_fence(text) {
        debug!("[Extract] Found object in fenced block");
        return Some(value);
    }

    let value = balanced_scan(text);
    if value.is_some() {
        debug!("[Extract] Found config by brace scan");
    }
    value
}

/// Whether an object mentions any indicator key, at any depth
pub fn has_indicator(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(key, nested)| INDICATOR_KEYS.contains(&key.as_str()) || has_indicator(nested)),
        Value::Array(items) => items.iter().any(has_indicator),
        _ => false,
    }
}

fn json_fence(text: &str) -> Option<Value> {
    let body = JSON_FENCE.captures(text)?.get(1)?.as_str().trim();
    parse_object(body).filter(has_indicator)
}

fn any_fence(text: &str) -> Option<Value> {
    let body = ANY_FENCE.captures(text)?.get(1)?.as_str().trim();
    parse_object(body)
}

fn balanced_scan(text: &str) -> Option<Value> {
    let pairs = brace_pairs(text);

    for key in ANCHOR_KEYS {
        let Some(anchor) = text.find(&format!("\"{}\"", key)) else {
            continue;
        };

        // Outermost candidate first
        let covering = pairs
            .iter()
            .take_while(|(open, _)| *open < anchor)
            .filter(|(_, close)| *close > anchor);
        for &(open, close) in covering {
            if let Some(value) = parse_object(&text[open..=close]) {
                return Some(value);
            }
        }
    }
    None
}

/// Byte indices of every matched `{`/`}` pair, ordered by the opening brace.
/// Inside an open brace, string literals are skipped so braces within them
/// do not count. Unmatched braces are ignored.
fn brace_pairs(text: &str) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(index),
            '}' => {
                if let Some(start) = open.pop() {
                    pairs.push((start, index));
                }
            }
            _ => {}
        }
    }

    pairs.sort_unstable_by_key(|&(start, _)| start);
    pairs
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
