//! Variable store contract
//!
//! The engine never owns variable storage. Everything it reads or writes goes
//! through [`VariableStore`]; listing and importing are async boundary calls,
//! mutations are synchronous.

mod memory;

use std::fmt;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokens_schema::{CodeSyntaxPlatform, ResolvedType, Rgba};

pub use memory::{MemoryStore, StoreConfig};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures reported by a variable store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The host does not support variables at all
    #[error("Variables are not supported by this store")]
    VariablesUnsupported,

    /// The host has no team library access
    #[error("Team libraries are not available")]
    LibraryUnavailable,

    /// No collection with this id
    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    /// No variable with this id or key
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// No mode with this id in the collection
    #[error("Mode not found: {0}")]
    ModeNotFound(ModeId),

    /// The collection cannot take another mode
    #[error("Collection {collection} already has the maximum of {limit} modes")]
    ModeLimit { collection: String, limit: usize },

    /// A value does not match the variable's resolved type
    #[error("Type mismatch for {variable}: expected {expected}, got {actual}")]
    TypeMismatch {
        variable: String,
        expected: ResolvedType,
        actual: ResolvedType,
    },

    /// Any other refusal
    #[error("{message}")]
    Rejected { message: String },
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a local collection
    CollectionId
);
string_id!(
    /// Identifier of a locally usable variable
    VariableId
);
string_id!(
    /// Identifier of a mode within a collection
    ModeId
);

/// A named mode of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMode {
    pub id: ModeId,
    pub name: String,
}

/// A collection owned by the local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub key: String,
    pub name: String,
    /// Modes in creation order; the first one is the default mode
    pub modes: Vec<CollectionMode>,
}

impl Collection {
    /// Find a mode by name.
    pub fn mode_named(&self, name: &str) -> Option<&CollectionMode> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// The default (first) mode
    pub fn default_mode(&self) -> Option<&CollectionMode> {
        self.modes.first()
    }
}

/// A value assigned to a variable for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VariableValue {
    Color(Rgba),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Link to another variable
    Alias(VariableId),
}

impl VariableValue {
    /// Resolved type of a literal; `None` for aliases.
    pub fn resolved_type(&self) -> Option<ResolvedType> {
        match self {
            Self::Color(_) => Some(ResolvedType::Color),
            Self::Float(_) => Some(ResolvedType::Float),
            Self::Boolean(_) => Some(ResolvedType::Boolean),
            Self::String(_) => Some(ResolvedType::String),
            Self::Alias(_) => None,
        }
    }
}

/// A variable that can be read and written locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub key: String,
    /// Slash-separated target name
    pub name: String,
    pub collection_id: CollectionId,
    pub resolved_type: ResolvedType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub code_syntax: IndexMap<CodeSyntaxPlatform, String>,
    #[serde(default)]
    pub values: IndexMap<ModeId, VariableValue>,
}

/// A collection published by a team library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryCollection {
    pub key: String,
    pub name: String,
    pub library_name: String,
}

/// A library variable; it must be imported before it can be referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryVariable {
    pub key: String,
    /// Slash-separated target name
    pub name: String,
    pub resolved_type: ResolvedType,
}

/// Access to a host's variable storage
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Whether the host supports variables at all
    fn supports_variables(&self) -> bool;

    /// Whether team library enumeration and import are available
    fn supports_library(&self) -> bool;

    /// List collections owned by the local file.
    async fn local_collections(&self) -> StoreResult<Vec<Collection>>;

    /// List variables owned by the local file.
    async fn local_variables(&self) -> StoreResult<Vec<Variable>>;

    /// List collections available from team libraries.
    async fn library_collections(&self) -> StoreResult<Vec<LibraryCollection>>;

    /// List the variables of one library collection.
    async fn library_variables(&self, collection_key: &str) -> StoreResult<Vec<LibraryVariable>>;

    /// Import a library variable so it can be used as an alias target.
    async fn import_variable_by_key(&mut self, key: &str) -> StoreResult<Variable>;

    /// Look up a local collection by id.
    fn collection(&self, id: &CollectionId) -> StoreResult<Option<Collection>>;

    /// Create a collection with a single default mode.
    fn create_collection(&mut self, name: &str) -> StoreResult<Collection>;

    /// Rename an existing mode.
    fn rename_mode(&mut self, collection: &CollectionId, mode: &ModeId, name: &str)
    -> StoreResult<()>;

    /// Add a mode; fails with [`StoreError::ModeLimit`] when the host refuses.
    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> StoreResult<ModeId>;

    /// Create a variable in a local collection.
    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        resolved_type: ResolvedType,
    ) -> StoreResult<Variable>;

    /// Set a variable's value for one mode.
    fn set_value(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> StoreResult<()>;

    /// Replace a variable's description.
    fn set_description(&mut self, variable: &VariableId, description: &str) -> StoreResult<()>;

    /// Replace a variable's scope list.
    fn set_scopes(&mut self, variable: &VariableId, scopes: &[String]) -> StoreResult<()>;

    /// Set the code-syntax hint for one platform.
    fn set_code_syntax(
        &mut self,
        variable: &VariableId,
        platform: CodeSyntaxPlatform,
        syntax: &str,
    ) -> StoreResult<()>;
}
