//! Manifest resolution
//!
//! An import without a manifest still needs collections and modes. The
//! synthesized manifest puts every document into one mode of one collection.

use indexmap::IndexMap;
use tokens_schema::{Manifest, ManifestCollection};

/// Mode name used when no manifest is supplied
pub const DEFAULT_MODE: &str = "Default";

/// Build the manifest used when none is supplied.
///
/// The single collection is named by joining the document names with ", "
/// and has one [`DEFAULT_MODE`] listing every document in input order.
pub fn default_manifest<I, S>(document_names: I) -> Manifest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let documents: Vec<String> = document_names.into_iter().map(Into::into).collect();
    let name = documents.join(", ");

    let mut modes = IndexMap::new();
    modes.insert(DEFAULT_MODE.to_string(), documents);

    let mut collections = IndexMap::new();
    collections.insert(name.clone(), ManifestCollection { modes });

    Manifest { name, collections }
}

/// Use the supplied manifest, or synthesize the default one.
pub fn resolve_manifest<I, S>(manifest: Option<Manifest>, document_names: I) -> Manifest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match manifest {
        Some(manifest) => manifest,
        None => {
            let manifest = default_manifest(document_names);
            tracing::debug!(collection = %manifest.name, "Synthesized default manifest");
            manifest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_manifest_single_collection() {
        let manifest = default_manifest(["global.json", "brand.json"]);

        assert_eq!(manifest.name, "global.json, brand.json");
        assert_eq!(manifest.collections.len(), 1);
        let collection = &manifest.collections["global.json, brand.json"];
        assert_eq!(collection.modes.len(), 1);
        assert_eq!(
            collection.modes[DEFAULT_MODE],
            vec!["global.json".to_string(), "brand.json".to_string()]
        );
    }

    #[test]
    fn test_resolve_keeps_supplied_manifest() {
        let supplied = default_manifest(["a.json"]);
        let resolved = resolve_manifest(Some(supplied.clone()), ["b.json"]);
        assert_eq!(resolved, supplied);
    }

    #[test]
    fn test_resolve_without_documents() {
        let resolved = resolve_manifest(None, Vec::<String>::new());
        assert_eq!(resolved.name, "");
        assert!(resolved.collections[""].modes[DEFAULT_MODE].is_empty());
    }
}
