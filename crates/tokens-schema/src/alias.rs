//! Alias reference syntax
//!
//! A token whose `$value` is exactly `{some.token.name}` refers to another
//! token instead of holding a literal.

use serde_json::Value;

/// Return the referenced token name if `value` is an alias reference.
///
/// Surrounding whitespace is tolerated; anything else around the braces
/// (or nested braces inside them) makes the value a plain string.
pub fn alias_target(value: &Value) -> Option<&str> {
    let text = value.as_str()?.trim();
    let inner = text.strip_prefix('{')?.strip_suffix('}')?.trim();

    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }

    Some(inner)
}
