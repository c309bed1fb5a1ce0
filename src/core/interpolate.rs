//! `{key}` placeholder interpolation

use super::context::Context;
use std::collections::HashMap;

/// Whether `key` may be used as a placeholder.
///
/// Allowed keys are non-empty and consist of ASCII alphanumerics plus
/// `.`, `-` and `_`, with at least one alphanumeric character.
pub fn is_placeholder_key(key: &str) -> bool {
    let mut has_alnum = false;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            has_alnum = true;
        } else if !matches!(c, '.' | '-' | '_') {
            return false;
        }
    }
    has_alnum
}

/// Whether `message` contains a `{key}` token for a usable key
pub fn references(message: &str, key: &str) -> bool {
    is_placeholder_key(key) && message.contains(&format!("{{{}}}", key))
}

/// Substitute `{key}` tokens with the textual form of context values.
///
/// Tokens naming unknown or disallowed keys are left verbatim. Substitution
/// is a single left-to-right pass: replaced text is never rescanned.
pub fn interpolate(message: &str, context: &Context) -> String {
    if !message.contains('{') {
        return message.to_string();
    }

    let replacements: HashMap<&str, String> = context
        .iter()
        .filter(|(key, _)| is_placeholder_key(key))
        .map(|(key, value)| (key.as_str(), value.to_text()))
        .collect();

    if replacements.is_empty() {
        return message.to_string();
    }

    let mut out = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let replaced = after_open.find('}').and_then(|close| {
            replacements
                .get(&after_open[..close])
                .map(|text| (text, close))
        });

        match replaced {
            Some((text, close)) => {
                out.push_str(text);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}
