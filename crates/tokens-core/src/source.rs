//! Loading import inputs from disk
//!
//! Documents are keyed by file name, which is also how manifests refer to
//! them. When no manifest path is given explicitly, an input whose shape is
//! a manifest is picked out of the document list.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tokens_schema::{Manifest, TokenDocument};

use crate::{Error, Result};

/// Documents and optional manifest for one import
#[derive(Debug, Clone, Default)]
pub struct ImportSource {
    /// Documents by name, in input order
    pub documents: IndexMap<String, TokenDocument>,
    pub manifest: Option<Manifest>,
    /// Name of the input the manifest came from
    manifest_name: Option<String>,
}

impl ImportSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every path, plus an explicit manifest if given.
    pub async fn load(paths: &[PathBuf], manifest: Option<&Path>) -> Result<Self> {
        let mut source = Self::new();

        if let Some(path) = manifest {
            let content = read(path).await?;
            source.manifest = Some(Manifest::parse(&content)?);
            source.manifest_name = Some(display_name(path));
        }

        for path in paths {
            let content = read(path).await?;
            let name = display_name(path);
            if manifest.is_some() {
                source.add_document(&name, &content)?;
            } else {
                source.add(&name, &content)?;
            }
        }

        tracing::debug!(
            documents = source.documents.len(),
            manifest = source.manifest_name.as_deref().unwrap_or("none"),
            "Loaded import sources"
        );
        Ok(source)
    }

    /// Add an input that may be either a document or a manifest.
    pub fn add(&mut self, name: &str, content: &str) -> Result<()> {
        let value: Value = serde_json::from_str(content)?;
        if !Manifest::looks_like_manifest(&value) {
            return self.insert_document(name, TokenDocument::from_value(name, value)?);
        }

        if let Some(first) = &self.manifest_name {
            return Err(Error::MultipleManifests {
                first: first.clone(),
                second: name.to_string(),
            });
        }
        self.manifest = Some(Manifest::from_value(value)?);
        self.manifest_name = Some(name.to_string());
        Ok(())
    }

    /// Add an input that is always a token document.
    pub fn add_document(&mut self, name: &str, content: &str) -> Result<()> {
        let document = TokenDocument::parse(name, content)?;
        self.insert_document(name, document)
    }

    fn insert_document(&mut self, name: &str, document: TokenDocument) -> Result<()> {
        if self.documents.contains_key(name) {
            return Err(Error::DuplicateDocument {
                name: name.to_string(),
            });
        }
        self.documents.insert(name.to_string(), document);
        Ok(())
    }

    /// Name of the input the manifest came from
    pub fn manifest_name(&self) -> Option<&str> {
        self.manifest_name.as_deref()
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"{ "name": "Set", "collections": { "C": { "modes": { "M": ["a.json"] } } } }"#;
    const DOCUMENT: &str = r##"{ "color": { "$type": "color", "$value": "#fff" } }"##;

    #[test]
    fn test_detects_manifest() {
        let mut source = ImportSource::new();
        source.add("a.json", DOCUMENT).unwrap();
        source.add("manifest.json", MANIFEST).unwrap();

        assert_eq!(source.documents.keys().collect::<Vec<_>>(), vec!["a.json"]);
        assert_eq!(source.manifest.as_ref().unwrap().name, "Set");
        assert_eq!(source.manifest_name(), Some("manifest.json"));
    }

    #[test]
    fn test_rejects_second_manifest() {
        let mut source = ImportSource::new();
        source.add("one.json", MANIFEST).unwrap();
        let err = source.add("two.json", MANIFEST).unwrap_err();
        assert!(matches!(err, Error::MultipleManifests { .. }));
    }

    #[test]
    fn test_rejects_duplicate_document() {
        let mut source = ImportSource::new();
        source.add("a.json", DOCUMENT).unwrap();
        let err = source.add_document("a.json", DOCUMENT).unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument { name } if name == "a.json"));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("tokens.json");
        let manifest = dir.path().join("manifest.json");
        std::fs::write(&doc, DOCUMENT).unwrap();
        std::fs::write(&manifest, MANIFEST).unwrap();

        let source = ImportSource::load(&[doc.clone(), manifest], None).await.unwrap();
        assert!(source.documents.contains_key("tokens.json"));
        assert!(source.manifest.is_some());

        let missing = dir.path().join("missing.json");
        let err = ImportSource::load(&[missing], None).await.unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
