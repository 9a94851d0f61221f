//! `${VAR}` expansion for host settings.
//!
//! Only the fields in [`SUBSTITUTED_FIELDS`] are expanded. Alias and action
//! definitions are command text for the host shell and pass through as
//! written. `$${VAR}` yields a literal `${VAR}`.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Dotted paths of the fields that may reference environment variables.
/// An array field has each string element expanded.
pub const SUBSTITUTED_FIELDS: &[&str] = &["botToken", "screenshot.command", "logging.dir", "logging.level"];

/// `${NAME}` with an optional leading `$` marking the escape.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$?)\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Environment variable {name} (used in {field}) is unset or empty")]
pub struct UnsetVariable {
    pub name: String,
    pub field: String,
}

/// A config tree with its host settings expanded.
#[derive(Debug)]
pub struct Substituted {
    pub value: Value,
    /// Variables read from the environment, sorted.
    pub variables: Vec<String>,
}

pub fn substitute_env(mut value: Value, env: &HashMap<String, String>) -> Result<Substituted, UnsetVariable> {
    let mut used = BTreeSet::new();
    for field in SUBSTITUTED_FIELDS {
        let pointer = format!("/{}", field.replace('.', "/"));
        match value.pointer_mut(&pointer) {
            Some(Value::String(text)) => *text = expand(text, env, field, &mut used)?,
            Some(Value::Array(items)) => {
                for (i, item) in items.iter_mut().enumerate() {
                    if let Value::String(text) = item {
                        *text = expand(text, env, &format!("{field}[{i}]"), &mut used)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(Substituted { value, variables: used.into_iter().collect() })
}

fn expand(
    text: &str,
    env: &HashMap<String, String>,
    field: &str,
    used: &mut BTreeSet<String>,
) -> Result<String, UnsetVariable> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in REFERENCE.captures_iter(text) {
        let Some(reference) = caps.get(0) else { continue };
        out.push_str(&text[last..reference.start()]);
        last = reference.end();

        let name = &caps[2];
        if !caps[1].is_empty() {
            out.push_str(&reference.as_str()[1..]);
            continue;
        }
        match env.get(name).filter(|v| !v.is_empty()) {
            Some(v) => {
                out.push_str(v);
                used.insert(name.to_string());
            }
            None => {
                return Err(UnsetVariable { name: name.to_string(), field: field.to_string() });
            }
        }
    }
    out.push_str(&text[last..]);
    Ok(out)
}
