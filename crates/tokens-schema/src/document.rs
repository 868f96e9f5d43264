//! Token documents and tree flattening

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::token::{Token, TokenType};
use crate::{Error, Result};

/// Maximum group nesting followed while flattening
const MAX_DEPTH: usize = 64;

/// A DTCG-style token document: nested groups with leaf tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDocument(Map<String, Value>);

impl TokenDocument {
    /// Wrap an already-parsed JSON object
    pub fn new(root: Map<String, Value>) -> Self {
        Self(root)
    }

    /// Build a document from a JSON value, which must be an object.
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self(root)),
            other => Err(Error::InvalidDocument {
                name: name.to_string(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Parse a document from JSON text.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(name, value)
    }

    /// The raw root object
    pub fn root(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Flatten the tree into `(dot.path.name, token)` pairs in document order.
    ///
    /// An object carrying `$value` is a token; any other object is a group.
    /// Group keys starting with `$` are metadata, except that a group's
    /// `$type` is inherited by descendants that do not declare their own.
    pub fn tokens(&self) -> Vec<(String, Token)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        walk(&self.0, &mut path, None, 0, &mut out);
        out
    }
}

fn walk<'a>(
    group: &'a Map<String, Value>,
    path: &mut Vec<&'a str>,
    inherited: Option<&'a str>,
    depth: usize,
    out: &mut Vec<(String, Token)>,
) {
    if depth > MAX_DEPTH {
        tracing::warn!(path = %path.join("."), "Token group nesting too deep, skipping");
        return;
    }

    let inherited = group
        .get("$type")
        .and_then(Value::as_str)
        .or(inherited);

    for (key, child) in group {
        if key.starts_with('$') {
            continue;
        }
        let Value::Object(node) = child else {
            continue;
        };

        path.push(key);
        if node.contains_key("$value") {
            out.push((path.join("."), leaf_token(node, inherited)));
        } else {
            walk(node, path, inherited, depth + 1, out);
        }
        path.pop();
    }
}

fn leaf_token(node: &Map<String, Value>, inherited: Option<&str>) -> Token {
    let token_type = node
        .get("$type")
        .and_then(Value::as_str)
        .or(inherited)
        .map(TokenType::from)
        .unwrap_or(TokenType::Untyped);

    Token {
        token_type,
        value: node.get("$value").cloned().unwrap_or(Value::Null),
        description: node
            .get("$description")
            .and_then(Value::as_str)
            .map(str::to_string),
        extensions: node.get("$extensions").and_then(Value::as_object).cloned(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(doc: &TokenDocument) -> Vec<String> {
        doc.tokens().into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_flatten_preserves_document_order() {
        let doc = TokenDocument::from_value(
            "doc.json",
            json!({
                "spacing": { "lg": { "$type": "dimension", "$value": "24px" } },
                "color": {
                    "red": { "$type": "color", "$value": "#f00" },
                    "blue": { "$type": "color", "$value": "#00f" }
                }
            }),
        )
        .unwrap();

        assert_eq!(names(&doc), vec!["spacing.lg", "color.red", "color.blue"]);
    }

    #[test]
    fn test_group_type_is_inherited() {
        let doc = TokenDocument::from_value(
            "doc.json",
            json!({
                "color": {
                    "$type": "color",
                    "$description": "Palette",
                    "red": { "$value": "#f00" },
                    "label": { "$type": "string", "$value": "Red" }
                },
                "loose": { "$value": 1 }
            }),
        )
        .unwrap();

        let tokens = doc.tokens();
        assert_eq!(tokens[0].1.token_type, TokenType::Color);
        assert_eq!(tokens[1].1.token_type, TokenType::String);
        assert_eq!(tokens[2].1.token_type, TokenType::Untyped);
    }

    #[test]
    fn test_metadata_and_scalars_are_skipped() {
        let doc = TokenDocument::from_value(
            "doc.json",
            json!({
                "$schema": "https://example.com/schema.json",
                "version": 3,
                "size": { "$type": "number", "$value": 2, "$description": "Two" }
            }),
        )
        .unwrap();

        let tokens = doc.tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].0, "size");
        assert_eq!(tokens[0].1.description.as_deref(), Some("Two"));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = TokenDocument::from_value("list.json", json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("list.json"));
        assert!(err.to_string().contains("an array"));
    }
}
