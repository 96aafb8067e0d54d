use serde_json::Value;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Reads `value` as a score in [0, 100]. Missing or non-numeric → 0.
pub fn score(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        0.0
    }
}

/// Reads `value` as a list of strings, dropping non-string items.
/// Missing or non-array → empty.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Non-empty string at `value`, if any.
pub fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
