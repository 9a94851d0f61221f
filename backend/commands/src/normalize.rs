//! Text normalization: split a raw message into action name and rest.
//!
//! Both functions are total over `&str`; malformed input yields an empty
//! result instead of an error.

/// Extract the canonical action name from a message text.
///
/// Leading whitespace and leading `/` characters are dropped and the first
/// whitespace-delimited token is lowercased. A slash followed directly by
/// whitespace (or nothing) yields `""`, meaning "empty action name".
pub fn action_name(text: &str) -> String {
    let stripped = text.trim_start().trim_start_matches('/');
    match stripped.chars().next() {
        None => String::new(),
        Some(c) if c.is_whitespace() => String::new(),
        Some(_) => stripped
            .split_whitespace()
            .next()
            .map(str::to_lowercase)
            .unwrap_or_default(),
    }
}

/// Everything after the first token of `text`.
///
/// With `cut_separator` the single whitespace character right after the
/// token is dropped as well; any further whitespace is kept verbatim.
pub fn command_rest(text: &str, cut_separator: bool) -> &str {
    let trimmed = text.trim_start();
    let Some((idx, sep)) = trimmed.char_indices().find(|(_, c)| c.is_whitespace()) else {
        return "";
    };
    if cut_separator {
        &trimmed[idx + sep.len_utf8()..]
    } else {
        &trimmed[idx..]
    }
}
