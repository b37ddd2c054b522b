use std::collections::BTreeMap;

pub const DEFAULT_USER_AGENT: &str = "dirChecker/1.3";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Parses `Key:Value,Key2:Value2` into a header map.
///
/// Keys and values are trimmed, only the first `:` splits a pair (so values
/// may contain colons), and a repeated key keeps the last value. Empty pairs
/// are skipped.
pub fn parse_custom_headers(value: &str) -> Result<BTreeMap<String, String>, String> {
    let mut out = BTreeMap::new();
    for pair in value.split(',') {
        if pair.trim().is_empty() {
            continue;
        }
        let (key, val) = pair
            .split_once(':')
            .ok_or_else(|| format!("expected 'Key:Value', got '{}'", pair.trim()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty header name in '{}'", pair.trim()));
        }
        out.insert(key.to_string(), val.trim().to_string());
    }
    Ok(out)
}

pub fn format_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn trim_url(url: &str) -> String {
    url.trim().to_string()
}
