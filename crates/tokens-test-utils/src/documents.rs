//! Inline token documents and manifests

use indexmap::IndexMap;
use serde_json::{Value, json};
use tokens_schema::{Manifest, TokenDocument};

/// Build a document from a JSON literal.
///
/// Panics if `value` is not an object.
pub fn document(name: &str, value: Value) -> TokenDocument {
    TokenDocument::from_value(name, value)
        .unwrap_or_else(|e| panic!("invalid test document {}: {}", name, e))
}

/// Build an ordered document set from `(name, json)` pairs.
pub fn documents(entries: &[(&str, Value)]) -> IndexMap<String, TokenDocument> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), document(name, value.clone())))
        .collect()
}

/// Leaf token JSON with a type and value.
pub fn token(token_type: &str, value: Value) -> Value {
    json!({ "$type": token_type, "$value": value })
}

/// Build a manifest from a JSON literal.
///
/// Panics if `value` does not have the manifest shape.
pub fn manifest(value: Value) -> Manifest {
    Manifest::from_value(value).unwrap_or_else(|e| panic!("invalid test manifest: {}", e))
}
