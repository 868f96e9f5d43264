//! In-memory variable store
//!
//! A complete [`VariableStore`] that keeps everything in process. The CLI
//! persists it as JSON between runs; tests seed it directly.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokens_schema::{CodeSyntaxPlatform, ResolvedType};

use super::{
    Collection, CollectionId, CollectionMode, LibraryCollection, LibraryVariable, ModeId,
    StoreError, StoreResult, Variable, VariableId, VariableStore, VariableValue,
};
use crate::Result;

/// Name given to the single mode of a new collection
const INITIAL_MODE_NAME: &str = "Mode 1";

/// Host capabilities and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Whether the host supports variables
    pub variables_enabled: bool,
    /// Whether team libraries can be listed and imported
    pub library_enabled: bool,
    /// Maximum modes per collection; `None` means unlimited
    pub max_modes: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            variables_enabled: true,
            library_enabled: true,
            max_modes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LibraryEntry {
    collection: LibraryCollection,
    variables: Vec<LibraryVariable>,
}

/// Variable store held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    config: StoreConfig,
    collections: Vec<Collection>,
    variables: Vec<Variable>,
    library: Vec<LibraryEntry>,
    /// Library variables imported so far, by key
    imported: IndexMap<String, Variable>,
    next_id: u64,
}

impl MemoryStore {
    /// Create an empty store with default capabilities
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given capabilities
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Restore a store from its JSON form.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize the store to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Current capabilities
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Mutable access to capabilities
    pub fn config_mut(&mut self) -> &mut StoreConfig {
        &mut self.config
    }

    /// All local collections
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// All local variables
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Library variables imported into this store
    pub fn imported(&self) -> impl Iterator<Item = &Variable> {
        self.imported.values()
    }

    /// Library collections with their variables
    pub fn library(&self) -> impl Iterator<Item = (&LibraryCollection, &[LibraryVariable])> {
        self.library
            .iter()
            .map(|e| (&e.collection, e.variables.as_slice()))
    }

    /// Find the first local collection with this name.
    pub fn collection_by_name(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Find the first local variable with this slash-separated name.
    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Value of a local variable for a mode name, without following aliases.
    pub fn value(&self, variable: &str, mode: &str) -> Option<&VariableValue> {
        let variable = self.variable_by_name(variable)?;
        let mode_id = &self.find_collection(&variable.collection_id)?.mode_named(mode)?.id;
        variable.values.get(mode_id)
    }

    /// Value of a local variable for a mode name, following alias links to a
    /// literal. A linked variable is read in the mode of the same name, or in
    /// its collection's default mode when there is none.
    pub fn resolved_value(&self, variable: &str, mode: &str) -> Option<&VariableValue> {
        let mut current = self.variable_by_name(variable)?;
        let mut mode_name = mode.to_string();

        // A chain can never be longer than the number of variables.
        for _ in 0..=self.variables.len() {
            let collection = self.find_collection(&current.collection_id)?;
            let mode = collection
                .mode_named(&mode_name)
                .or_else(|| collection.default_mode())?;
            mode_name = mode.name.clone();

            match current.values.get(&mode.id)? {
                VariableValue::Alias(target) => current = self.variable_by_id(target)?,
                literal => return Some(literal),
            }
        }
        None
    }

    /// Seed a local collection with the given modes.
    ///
    /// The first mode becomes the default; an empty list yields one mode
    /// named "Mode 1".
    pub fn insert_collection(&mut self, name: &str, modes: &[&str]) -> CollectionId {
        let id = CollectionId(format!("VariableCollectionId:{}", self.bump()));
        let mut collection = Collection {
            id: id.clone(),
            key: format!("collection-key-{}", id.0),
            name: name.to_string(),
            modes: Vec::new(),
        };

        let names: Vec<&str> = if modes.is_empty() {
            vec![INITIAL_MODE_NAME]
        } else {
            modes.to_vec()
        };
        for mode in names {
            let mode_id = ModeId(format!("{}:{}", self.bump(), collection.modes.len()));
            collection.modes.push(CollectionMode {
                id: mode_id,
                name: mode.to_string(),
            });
        }

        self.collections.push(collection);
        id
    }

    /// Seed a local variable with literal values keyed by mode name.
    pub fn insert_variable(
        &mut self,
        collection: &CollectionId,
        name: &str,
        resolved_type: ResolvedType,
        values: &[(&str, VariableValue)],
    ) -> StoreResult<VariableId> {
        let variable = self.create_variable(name, collection, resolved_type)?;
        for (mode, value) in values {
            let mode_id = self
                .find_collection(collection)
                .and_then(|c| c.mode_named(mode))
                .map(|m| m.id.clone())
                .ok_or_else(|| StoreError::Rejected {
                    message: format!("Collection {} has no mode named {}", collection, mode),
                })?;
            self.set_value(&variable.id, &mode_id, value.clone())?;
        }
        Ok(variable.id)
    }

    /// Seed a team library collection; returns its key.
    pub fn insert_library_collection(&mut self, library_name: &str, name: &str) -> String {
        let key = format!("library-collection-{}", self.bump());
        self.library.push(LibraryEntry {
            collection: LibraryCollection {
                key: key.clone(),
                name: name.to_string(),
                library_name: library_name.to_string(),
            },
            variables: Vec::new(),
        });
        key
    }

    /// Seed a variable into a library collection; returns its key.
    pub fn insert_library_variable(
        &mut self,
        collection_key: &str,
        name: &str,
        resolved_type: ResolvedType,
    ) -> StoreResult<String> {
        let key = format!("library-variable-{}", self.bump());
        let entry = self
            .library
            .iter_mut()
            .find(|e| e.collection.key == collection_key)
            .ok_or_else(|| StoreError::Rejected {
                message: format!("Library collection not found: {}", collection_key),
            })?;
        entry.variables.push(LibraryVariable {
            key: key.clone(),
            name: name.to_string(),
            resolved_type,
        });
        Ok(key)
    }

    fn bump(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn find_collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|c| &c.id == id)
    }

    fn find_collection_mut(&mut self, id: &CollectionId) -> StoreResult<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.clone()))
    }

    /// Local or imported variable by id
    pub fn variable_by_id(&self, id: &VariableId) -> Option<&Variable> {
        self.variables
            .iter()
            .chain(self.imported.values())
            .find(|v| &v.id == id)
    }

    /// Local variables only; imported ones are read-only.
    fn local_variable_mut(&mut self, id: &VariableId) -> StoreResult<&mut Variable> {
        if self.imported.values().any(|v| &v.id == id) {
            return Err(StoreError::Rejected {
                message: format!("Variable {} is owned by a library and is read-only", id),
            });
        }
        self.variables
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| StoreError::VariableNotFound(id.to_string()))
    }

    fn ensure_variables(&self) -> StoreResult<()> {
        if self.config.variables_enabled {
            Ok(())
        } else {
            Err(StoreError::VariablesUnsupported)
        }
    }

    fn ensure_library(&self) -> StoreResult<()> {
        if self.config.library_enabled {
            Ok(())
        } else {
            Err(StoreError::LibraryUnavailable)
        }
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    fn supports_variables(&self) -> bool {
        self.config.variables_enabled
    }

    fn supports_library(&self) -> bool {
        self.config.library_enabled
    }

    async fn local_collections(&self) -> StoreResult<Vec<Collection>> {
        self.ensure_variables()?;
        Ok(self.collections.clone())
    }

    async fn local_variables(&self) -> StoreResult<Vec<Variable>> {
        self.ensure_variables()?;
        Ok(self.variables.clone())
    }

    async fn library_collections(&self) -> StoreResult<Vec<LibraryCollection>> {
        self.ensure_library()?;
        Ok(self.library.iter().map(|e| e.collection.clone()).collect())
    }

    async fn library_variables(&self, collection_key: &str) -> StoreResult<Vec<LibraryVariable>> {
        self.ensure_library()?;
        self.library
            .iter()
            .find(|e| e.collection.key == collection_key)
            .map(|e| e.variables.clone())
            .ok_or_else(|| StoreError::Rejected {
                message: format!("Library collection not found: {}", collection_key),
            })
    }

    async fn import_variable_by_key(&mut self, key: &str) -> StoreResult<Variable> {
        self.ensure_library()?;
        if let Some(existing) = self.imported.get(key) {
            return Ok(existing.clone());
        }

        let (collection, source) = self
            .library
            .iter()
            .find_map(|e| {
                e.variables
                    .iter()
                    .find(|v| v.key == key)
                    .map(|v| (e.collection.clone(), v.clone()))
            })
            .ok_or_else(|| StoreError::VariableNotFound(key.to_string()))?;

        let variable = Variable {
            id: VariableId(format!("VariableID:{}/{}", source.key, self.bump())),
            key: source.key.clone(),
            name: source.name,
            collection_id: CollectionId(collection.key),
            resolved_type: source.resolved_type,
            description: String::new(),
            scopes: Vec::new(),
            code_syntax: IndexMap::new(),
            values: IndexMap::new(),
        };
        self.imported.insert(source.key, variable.clone());
        Ok(variable)
    }

    fn collection(&self, id: &CollectionId) -> StoreResult<Option<Collection>> {
        self.ensure_variables()?;
        Ok(self.find_collection(id).cloned())
    }

    fn create_collection(&mut self, name: &str) -> StoreResult<Collection> {
        self.ensure_variables()?;
        let id = self.insert_collection(name, &[]);
        self.find_collection(&id)
            .cloned()
            .ok_or(StoreError::CollectionNotFound(id))
    }

    fn rename_mode(
        &mut self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> StoreResult<()> {
        let collection = self.find_collection_mut(collection)?;
        let mode = collection
            .modes
            .iter_mut()
            .find(|m| &m.id == mode)
            .ok_or_else(|| StoreError::ModeNotFound(mode.clone()))?;
        mode.name = name.to_string();
        Ok(())
    }

    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> StoreResult<ModeId> {
        let limit = self.config.max_modes;
        let serial = self.bump();
        let collection = self.find_collection_mut(collection)?;

        if let Some(limit) = limit
            && collection.modes.len() >= limit
        {
            return Err(StoreError::ModeLimit {
                collection: collection.name.clone(),
                limit,
            });
        }

        let id = ModeId(format!("{}:{}", serial, collection.modes.len()));
        collection.modes.push(CollectionMode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        resolved_type: ResolvedType,
    ) -> StoreResult<Variable> {
        self.ensure_variables()?;
        if self.find_collection(collection).is_none() {
            return Err(StoreError::CollectionNotFound(collection.clone()));
        }
        if self
            .variables
            .iter()
            .any(|v| &v.collection_id == collection && v.name == name)
        {
            return Err(StoreError::Rejected {
                message: format!("A variable named {} already exists in this collection", name),
            });
        }

        let serial = self.bump();
        let variable = Variable {
            id: VariableId(format!("VariableID:{}", serial)),
            key: format!("variable-key-{}", serial),
            name: name.to_string(),
            collection_id: collection.clone(),
            resolved_type,
            description: String::new(),
            scopes: Vec::new(),
            code_syntax: IndexMap::new(),
            values: IndexMap::new(),
        };
        self.variables.push(variable.clone());
        Ok(variable)
    }

    fn set_value(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> StoreResult<()> {
        let actual = match &value {
            VariableValue::Alias(target) => {
                if target == variable {
                    return Err(StoreError::Rejected {
                        message: format!("Variable {} cannot alias itself", variable),
                    });
                }
                self.variable_by_id(target)
                    .ok_or_else(|| StoreError::VariableNotFound(target.to_string()))?
                    .resolved_type
            }
            // Literal payloads always carry a type.
            literal => literal.resolved_type().unwrap_or(ResolvedType::String),
        };

        let collection_id = self.local_variable_mut(variable)?.collection_id.clone();
        let has_mode = self
            .find_collection(&collection_id)
            .is_some_and(|c| c.modes.iter().any(|m| &m.id == mode));
        if !has_mode {
            return Err(StoreError::ModeNotFound(mode.clone()));
        }

        let target = self.local_variable_mut(variable)?;
        if target.resolved_type != actual {
            return Err(StoreError::TypeMismatch {
                variable: target.name.clone(),
                expected: target.resolved_type,
                actual,
            });
        }
        target.values.insert(mode.clone(), value);
        Ok(())
    }

    fn set_description(&mut self, variable: &VariableId, description: &str) -> StoreResult<()> {
        self.local_variable_mut(variable)?.description = description.to_string();
        Ok(())
    }

    fn set_scopes(&mut self, variable: &VariableId, scopes: &[String]) -> StoreResult<()> {
        let target = self.local_variable_mut(variable)?;
        if !target.resolved_type.supports_scopes() {
            return Err(StoreError::Rejected {
                message: format!("{} variables do not support scopes", target.resolved_type),
            });
        }
        target.scopes = scopes.to_vec();
        Ok(())
    }

    fn set_code_syntax(
        &mut self,
        variable: &VariableId,
        platform: CodeSyntaxPlatform,
        syntax: &str,
    ) -> StoreResult<()> {
        self.local_variable_mut(variable)?
            .code_syntax
            .insert(platform, syntax.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_schema::Rgba;

    #[tokio::test]
    async fn test_create_collection_has_default_mode() {
        let mut store = MemoryStore::new();
        let collection = store.create_collection("Theme").unwrap();

        assert_eq!(collection.modes.len(), 1);
        assert_eq!(collection.modes[0].name, "Mode 1");
        assert_eq!(store.local_collections().await.unwrap().len(), 1);
    }

    #[test]
    fn test_add_mode_respects_limit() {
        let mut store = MemoryStore::with_config(StoreConfig {
            max_modes: Some(2),
            ..StoreConfig::default()
        });
        let id = store.insert_collection("Theme", &["Light"]);

        assert!(store.add_mode(&id, "Dark").is_ok());
        let err = store.add_mode(&id, "Dim").unwrap_err();
        assert_eq!(
            err,
            StoreError::ModeLimit {
                collection: "Theme".to_string(),
                limit: 2
            }
        );
    }

    #[test]
    fn test_set_value_checks_type() {
        let mut store = MemoryStore::new();
        let collection = store.insert_collection("Theme", &["Light"]);
        let mode = store.collections()[0].modes[0].id.clone();
        let variable = store
            .create_variable("color/brand", &collection, ResolvedType::Color)
            .unwrap();

        let err = store
            .set_value(&variable.id, &mode, VariableValue::Float(1.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));

        let red = VariableValue::Color(Rgba::new(1.0, 0.0, 0.0, 1.0));
        store.set_value(&variable.id, &mode, red.clone()).unwrap();
        assert_eq!(store.value("color/brand", "Light"), Some(&red));
    }

    #[test]
    fn test_duplicate_variable_name_rejected() {
        let mut store = MemoryStore::new();
        let collection = store.insert_collection("Theme", &[]);
        store
            .create_variable("size", &collection, ResolvedType::Float)
            .unwrap();
        assert!(
            store
                .create_variable("size", &collection, ResolvedType::Float)
                .is_err()
        );
    }

    #[test]
    fn test_resolved_value_follows_aliases() {
        let mut store = MemoryStore::new();
        let collection = store.insert_collection("Theme", &["Light"]);
        let base = store
            .insert_variable(
                &collection,
                "base",
                ResolvedType::Float,
                &[("Light", VariableValue::Float(8.0))],
            )
            .unwrap();
        store
            .insert_variable(
                &collection,
                "alias",
                ResolvedType::Float,
                &[("Light", VariableValue::Alias(base))],
            )
            .unwrap();

        assert_eq!(
            store.resolved_value("alias", "Light"),
            Some(&VariableValue::Float(8.0))
        );
    }

    #[tokio::test]
    async fn test_import_is_idempotent_and_read_only() {
        let mut store = MemoryStore::new();
        let key = store.insert_library_collection("Brand", "Palette");
        let var_key = store
            .insert_library_variable(&key, "color/red", ResolvedType::Color)
            .unwrap();

        let first = store.import_variable_by_key(&var_key).await.unwrap();
        let second = store.import_variable_by_key(&var_key).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.imported().count(), 1);
        assert!(store.set_description(&first.id, "nope").is_err());
    }

    #[tokio::test]
    async fn test_library_disabled() {
        let mut store = MemoryStore::with_config(StoreConfig {
            library_enabled: false,
            ..StoreConfig::default()
        });
        assert!(!store.supports_library());
        assert_eq!(
            store.library_collections().await.unwrap_err(),
            StoreError::LibraryUnavailable
        );
        assert!(store.import_variable_by_key("k").await.is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_state() {
        let mut store = MemoryStore::new();
        let collection = store.insert_collection("Theme", &["Light", "Dark"]);
        store
            .insert_variable(
                &collection,
                "flag",
                ResolvedType::Boolean,
                &[("Dark", VariableValue::Boolean(true))],
            )
            .unwrap();

        let restored = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored, store);
    }
}
