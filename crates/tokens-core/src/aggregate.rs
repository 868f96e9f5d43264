//! Token aggregation
//!
//! Walks the manifest's collections and modes in order, flattens each
//! referenced document and routes every token into a per-name aggregate.
//! The first token seen for a `(name, mode)` pair wins; later ones are
//! recorded as errors rather than overwriting it.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokens_schema::{Manifest, Token, TokenDocument};

/// Why a token was rejected during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateErrorCode {
    /// The token's type has no target representation
    Type,
    /// The mode was already populated for this name
    Duplicated,
}

impl fmt::Display for AggregateErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Duplicated => write!(f, "duplicated"),
        }
    }
}

/// A rejected token occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateError {
    pub code: AggregateErrorCode,
    pub message: String,
}

/// Everything the import supplies for one token name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedVariable {
    /// Dot-path token name
    pub name: String,
    /// Collection that owns the variable
    pub collection_name: String,
    /// Token per mode name, in first-seen order
    pub modes: IndexMap<String, Token>,
    /// Whether any accepted mode value is an alias
    pub is_alias: bool,
    /// Alias target of the most recent aliased mode
    pub target_name: Option<String>,
    pub errors: Vec<AggregateError>,
}

impl AggregatedVariable {
    fn new(name: &str, collection_name: &str) -> Self {
        Self {
            name: name.to_string(),
            collection_name: collection_name.to_string(),
            modes: IndexMap::new(),
            is_alias: false,
            target_name: None,
            errors: Vec::new(),
        }
    }

    /// Whether this name can be created or updated
    pub fn is_candidate(&self) -> bool {
        !self.modes.is_empty()
    }
}

/// A manifest entry naming a document that was not supplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDocument {
    pub collection: String,
    pub mode: String,
    pub document: String,
}

/// Aggregated view of every token in an import
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    variables: IndexMap<String, AggregatedVariable>,
    missing_documents: Vec<MissingDocument>,
}

impl Aggregation {
    /// Aggregate `documents` according to `manifest`.
    pub fn build(manifest: &Manifest, documents: &IndexMap<String, TokenDocument>) -> Self {
        let mut aggregation = Self::default();

        for (collection, mode, document_names) in manifest.modes() {
            for document_name in document_names {
                let Some(document) = documents.get(document_name) else {
                    tracing::warn!(
                        %collection, %mode, document = %document_name,
                        "Manifest references a document that was not supplied"
                    );
                    aggregation.missing_documents.push(MissingDocument {
                        collection: collection.to_string(),
                        mode: mode.to_string(),
                        document: document_name.clone(),
                    });
                    continue;
                };

                for (name, token) in document.tokens() {
                    aggregation.route(collection, mode, name, token);
                }
            }
        }

        tracing::debug!(
            names = aggregation.variables.len(),
            candidates = aggregation.candidates().count(),
            "Aggregated tokens"
        );
        aggregation
    }

    fn route(&mut self, collection: &str, mode: &str, name: String, token: Token) {
        let entry = self
            .variables
            .entry(name)
            .or_insert_with_key(|name| AggregatedVariable::new(name, collection));

        if !token.token_type.is_supported() {
            entry.errors.push(AggregateError {
                code: AggregateErrorCode::Type,
                message: format!("{} type is not supported", token.token_type),
            });
            return;
        }

        if entry.modes.contains_key(mode) {
            entry.errors.push(AggregateError {
                code: AggregateErrorCode::Duplicated,
                message: format!("{}, {}, {} already exists", collection, entry.name, mode),
            });
            return;
        }

        if entry.modes.is_empty() {
            entry.collection_name = collection.to_string();
        }
        if let Some(target) = token.alias_target() {
            entry.is_alias = true;
            entry.target_name = Some(target.to_string());
        }
        entry.modes.insert(mode.to_string(), token);
    }

    /// Look up an aggregate by token name.
    pub fn get(&self, name: &str) -> Option<&AggregatedVariable> {
        self.variables.get(name)
    }

    /// Every aggregate, including names that only produced errors
    pub fn variables(&self) -> impl Iterator<Item = &AggregatedVariable> {
        self.variables.values()
    }

    /// Aggregates with at least one accepted mode value, in first-seen order
    pub fn candidates(&self) -> impl Iterator<Item = &AggregatedVariable> {
        self.variables.values().filter(|v| v.is_candidate())
    }

    /// Names of [`candidates`](Self::candidates)
    pub fn candidate_names(&self) -> impl Iterator<Item = &str> {
        self.candidates().map(|v| v.name.as_str())
    }

    /// Every recorded error as `(token name, error)`
    pub fn errors(&self) -> impl Iterator<Item = (&str, &AggregateError)> {
        self.variables
            .values()
            .flat_map(|v| v.errors.iter().map(move |e| (v.name.as_str(), e)))
    }

    /// Manifest entries whose document was not supplied
    pub fn missing_documents(&self) -> &[MissingDocument] {
        &self.missing_documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::default_manifest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn docs(entries: &[(&str, serde_json::Value)]) -> IndexMap<String, TokenDocument> {
        entries
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    TokenDocument::from_value(name, value.clone()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_duplicate_mode_keeps_first() {
        let documents = docs(&[
            ("a.json", json!({ "size": { "$type": "number", "$value": 1 } })),
            ("b.json", json!({ "size": { "$type": "number", "$value": 2 } })),
        ]);
        let manifest = default_manifest(documents.keys().cloned());

        let aggregation = Aggregation::build(&manifest, &documents);
        let size = aggregation.get("size").unwrap();

        assert_eq!(size.modes["Default"].value, json!(1));
        assert_eq!(size.errors.len(), 1);
        assert_eq!(size.errors[0].code, AggregateErrorCode::Duplicated);
    }

    #[test]
    fn test_unsupported_type_never_candidate() {
        let documents = docs(&[(
            "a.json",
            json!({
                "shadow": { "$type": "shadow", "$value": { "x": 1 } },
                "font": { "$value": "Inter" },
                "gap": { "$type": "dimension", "$value": "4px" }
            }),
        )]);
        let manifest = default_manifest(documents.keys().cloned());

        let aggregation = Aggregation::build(&manifest, &documents);

        assert_eq!(aggregation.candidate_names().collect::<Vec<_>>(), vec!["gap"]);
        let codes: Vec<_> = aggregation.errors().map(|(n, e)| (n, e.code)).collect();
        assert_eq!(
            codes,
            vec![
                ("shadow", AggregateErrorCode::Type),
                ("font", AggregateErrorCode::Type),
            ]
        );
    }

    #[test]
    fn test_alias_marked_without_target() {
        let documents = docs(&[(
            "a.json",
            json!({ "brand": { "$type": "color", "$value": "{palette.blue}" } }),
        )]);
        let manifest = default_manifest(documents.keys().cloned());

        let aggregation = Aggregation::build(&manifest, &documents);
        let brand = aggregation.get("brand").unwrap();

        assert!(brand.is_alias);
        assert_eq!(brand.target_name.as_deref(), Some("palette.blue"));
    }

    #[test]
    fn test_modes_follow_manifest() {
        let documents = docs(&[
            ("light.json", json!({ "bg": { "$type": "color", "$value": "#fff" } })),
            ("dark.json", json!({ "bg": { "$type": "color", "$value": "#000" } })),
        ]);
        let manifest = Manifest::parse(
            r#"{ "collections": { "Theme": { "modes": {
                "Light": ["light.json"], "Dark": ["dark.json", "extra.json"]
            } } } }"#,
        )
        .unwrap();

        let aggregation = Aggregation::build(&manifest, &documents);
        let bg = aggregation.get("bg").unwrap();

        assert_eq!(bg.collection_name, "Theme");
        assert_eq!(bg.modes.keys().collect::<Vec<_>>(), vec!["Light", "Dark"]);
        assert_eq!(
            aggregation.missing_documents(),
            &[MissingDocument {
                collection: "Theme".to_string(),
                mode: "Dark".to_string(),
                document: "extra.json".to_string(),
            }]
        );
    }
}
