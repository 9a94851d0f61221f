//! Config redaction: produce safe-to-print config snapshots by masking secrets.
//!
//! Masks values under secret-looking keys, and anything shaped like a
//! Telegram bot token wherever it appears (e.g. inside a shell command).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECRET_KEYS: &[&str] = &["botToken", "bot_token", "token", "secret", "password", "apiKey"];

/// `<bot id>:<secret>` as issued by BotFather.
static BOT_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{6,12}:[A-Za-z0-9_-]{30,}").unwrap());

/// Redact a config JSON value, replacing sensitive values with `"***"`-suffixed hints.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if is_sensitive_key(key) && !s.is_empty() {
        // First 4 chars as a hint.
        let hint: String = s.chars().take(4).collect();
        let hint = if s.chars().count() > 4 { format!("{hint}***") } else { "***".to_string() };
        return Value::String(hint);
    }
    Value::String(BOT_TOKEN_PATTERN.replace_all(s, "***").into_owned())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

/// Collect all field paths that would be redacted.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_sensitive_key(key) || BOT_TOKEN_PATTERN.is_match(s) {
                out.push(path.to_string());
            }
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                collect_paths_recursive(v, &format!("{path}[{i}]"), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOKEN: &str = "1234567890:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghij";

    #[test]
    fn redacts_bot_token_field() {
        let redacted = redact(&json!({ "botToken": TOKEN }));
        assert_eq!(redacted["botToken"], "1234***");
    }

    #[test]
    fn redacts_token_inside_commands() {
        let v = json!({ "aliases": { "ping": format!("/shell curl https://api.telegram.org/bot{TOKEN}/getMe") } });
        let redacted = redact(&v);
        let text = redacted["aliases"]["ping"].as_str().unwrap();
        assert!(!text.contains("ABCDEFGHIJ"));
        assert!(text.contains("***"));
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "admins": [123456789] });
        assert_eq!(redact(&v), v);
    }

    #[test]
    fn lists_redacted_paths() {
        let v = json!({ "botToken": "abc", "actions": { "x": { "argv": ["echo", TOKEN] } } });
        assert_eq!(collect_redacted_paths(&v), vec!["botToken", "actions.x.argv[1]"]);
    }
}
