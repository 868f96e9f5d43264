//! Update queue construction

use tokens_schema::{Token, token_name_to_target};

use crate::aggregate::Aggregation;
use crate::diff::NameDiff;

/// One `(variable, mode)` assignment waiting to be applied
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedUpdate {
    /// Slash-separated name the variable has in the store
    pub target_name: String,
    /// Dot-path token name
    pub token_name: String,
    pub token: Token,
    pub collection_name: String,
    pub mode_name: String,
}

impl QueuedUpdate {
    /// Alias target token name, if the token is an alias
    pub fn alias_target(&self) -> Option<&str> {
        self.token.alias_target()
    }
}

/// Build one queued update per candidate name and mode.
///
/// Items follow aggregation order, then mode order within a name.
pub fn build_queue(aggregation: &Aggregation, diff: &NameDiff) -> Vec<QueuedUpdate> {
    let candidates: std::collections::HashSet<&str> = diff.candidates().collect();

    aggregation
        .candidates()
        .filter(|variable| candidates.contains(variable.name.as_str()))
        .flat_map(|variable| {
            variable.modes.iter().map(move |(mode, token)| QueuedUpdate {
                target_name: token_name_to_target(&variable.name),
                token_name: variable.name.clone(),
                token: token.clone(),
                collection_name: variable.collection_name.clone(),
                mode_name: mode.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::default_manifest;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokens_schema::{Manifest, TokenDocument};

    #[test]
    fn test_one_item_per_mode() {
        let mut documents = IndexMap::new();
        documents.insert(
            "light.json".to_string(),
            TokenDocument::from_value("light.json", json!({ "color": { "bg": { "$type": "color", "$value": "#fff" } } })).unwrap(),
        );
        documents.insert(
            "dark.json".to_string(),
            TokenDocument::from_value("dark.json", json!({ "color": { "bg": { "$type": "color", "$value": "#000" } } })).unwrap(),
        );
        let manifest = Manifest::parse(
            r#"{ "collections": { "Theme": { "modes": { "Light": ["light.json"], "Dark": ["dark.json"] } } } }"#,
        )
        .unwrap();

        let aggregation = Aggregation::build(&manifest, &documents);
        let diff = NameDiff::compute(Vec::<&str>::new(), aggregation.candidate_names());
        let queue = build_queue(&aggregation, &diff);

        let items: Vec<_> = queue
            .iter()
            .map(|q| (q.target_name.as_str(), q.mode_name.as_str(), q.collection_name.as_str()))
            .collect();
        assert_eq!(
            items,
            vec![("color/bg", "Light", "Theme"), ("color/bg", "Dark", "Theme")]
        );
    }

    #[test]
    fn test_non_candidates_skipped() {
        let mut documents = IndexMap::new();
        documents.insert(
            "a.json".to_string(),
            TokenDocument::from_value("a.json", json!({ "font": { "$type": "fontFamily", "$value": "Inter" } })).unwrap(),
        );
        let manifest = default_manifest(["a.json"]);

        let aggregation = Aggregation::build(&manifest, &documents);
        let diff = NameDiff::compute(Vec::<&str>::new(), aggregation.candidate_names());

        assert!(build_queue(&aggregation, &diff).is_empty());
    }
}
