//! Import manifests
//!
//! A manifest maps every collection to its modes, and every mode to the
//! ordered list of documents that populate it:
//!
//! ```json
//! {
//!   "name": "Web tokens",
//!   "collections": {
//!     "Global": { "modes": { "Default": ["global.json"] } },
//!     "Alias": { "modes": { "Light": ["light.json"], "Dark": ["dark.json"] } }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Which documents feed which collection and mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Display name of the token set
    #[serde(default)]
    pub name: String,
    /// Collections in declaration order
    #[serde(default)]
    pub collections: IndexMap<String, ManifestCollection>,
}

/// The modes of one manifest collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCollection {
    /// Mode name to ordered document names
    #[serde(default)]
    pub modes: IndexMap<String, Vec<String>>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Build a manifest from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        if !Self::looks_like_manifest(&value) {
            return Err(Error::InvalidManifest {
                message: "expected an object with a \"collections\" object".to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| Error::InvalidManifest {
            message: e.to_string(),
        })
    }

    /// Whether a JSON value has the shape of a manifest rather than a
    /// token document.
    pub fn looks_like_manifest(value: &Value) -> bool {
        let Some(root) = value.as_object() else {
            return false;
        };
        !root.contains_key("$value")
            && root.get("collections").is_some_and(Value::is_object)
            && root.get("name").is_none_or(Value::is_string)
    }

    /// Iterate `(collection, mode, documents)` in manifest order.
    pub fn modes(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.collections.iter().flat_map(|(collection, entry)| {
            entry.modes
                .iter()
                .map(move |(mode, docs)| (collection.as_str(), mode.as_str(), docs.as_slice()))
        })
    }
}
