//! Target inventory
//!
//! Builds the merged read namespace of existing variables before an import.
//! Local entries always win over library entries, and within each source the
//! first entry seen under a name wins; every collision is reported as a
//! warning.

use indexmap::IndexMap;
use tokens_schema::{ResolvedType, target_name_to_token};

use crate::report::ImportReport;
use crate::store::{
    Collection, CollectionId, CollectionMode, LibraryCollection, LibraryVariable, Variable,
    VariableStore,
};

/// An existing variable, tagged by ownership
#[derive(Debug, Clone, PartialEq)]
pub enum TargetVariable {
    /// Owned by the local file; can be updated and linked directly
    Local(Variable),
    /// Published by a library; must be imported before it can be linked
    Remote(LibraryVariable),
}

impl TargetVariable {
    /// Slash-separated target name
    pub fn name(&self) -> &str {
        match self {
            Self::Local(v) => &v.name,
            Self::Remote(v) => &v.name,
        }
    }

    /// Resolved type of the variable
    pub fn resolved_type(&self) -> ResolvedType {
        match self {
            Self::Local(v) => v.resolved_type,
            Self::Remote(v) => v.resolved_type,
        }
    }

    /// Whether the variable is owned by the local file
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// An existing collection, tagged by ownership
#[derive(Debug, Clone, PartialEq)]
pub enum TargetCollection {
    Local(Collection),
    Remote(LibraryCollection),
}

/// Merged view of every collection and variable visible to an import
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    collections: IndexMap<String, TargetCollection>,
    /// Token name (dot path) to variable
    variables: IndexMap<String, TargetVariable>,
    library_available: bool,
}

impl Inventory {
    /// Enumerate the store and merge everything into one namespace.
    ///
    /// Listing failures are reported and treated as empty listings; a store
    /// without library support simply contributes no remote entries.
    pub async fn build<S>(store: &S, report: &mut ImportReport) -> Self
    where
        S: VariableStore + ?Sized,
    {
        let mut inventory = Self {
            library_available: store.supports_library(),
            ..Self::default()
        };

        let local_collections = store.local_collections().await.unwrap_or_else(|e| {
            report.error(format!("Failed to list local collections: {}", e));
            Vec::new()
        });
        for collection in local_collections {
            if inventory.collections.contains_key(&collection.name) {
                tracing::warn!(name = %collection.name, "Duplicate local collection");
                report.warning(format!(
                    "The collection named \"{} [{}]\" already exists locally. Please remove or rename duplicated collection entries to avoid conflicts.",
                    collection.name, collection.id
                ));
            } else {
                inventory
                    .collections
                    .insert(collection.name.clone(), TargetCollection::Local(collection));
            }
        }

        let local_variables = store.local_variables().await.unwrap_or_else(|e| {
            report.error(format!("Failed to list local variables: {}", e));
            Vec::new()
        });
        for variable in local_variables {
            let name = target_name_to_token(&variable.name);
            if inventory.variables.contains_key(&name) {
                let collection = store
                    .collection(&variable.collection_id)
                    .ok()
                    .flatten()
                    .map(|c| format!("{} [{}]", c.name, c.id))
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::warn!(%name, "Duplicate local variable");
                report.warning(format!(
                    "The variable \"{} [{}]\" in the local \"{}\" collection already exists. Please remove or rename duplicated variable entries to avoid conflicts.",
                    variable.name, variable.id, collection
                ));
            } else {
                inventory
                    .variables
                    .insert(name, TargetVariable::Local(variable));
            }
        }

        if inventory.library_available {
            inventory.merge_library(store, report).await;
        } else {
            tracing::debug!("Library support unavailable, skipping remote enumeration");
        }

        tracing::debug!(
            collections = inventory.collections.len(),
            variables = inventory.variables.len(),
            "Built target inventory"
        );
        inventory
    }

    async fn merge_library<S>(&mut self, store: &S, report: &mut ImportReport)
    where
        S: VariableStore + ?Sized,
    {
        let remote_collections = store.library_collections().await.unwrap_or_else(|e| {
            report.warning(format!("Failed to list library collections: {}", e));
            Vec::new()
        });

        for collection in remote_collections {
            let duplicate = self.collections.contains_key(&collection.name);
            if duplicate {
                report.warning(format!(
                    "The remote collection named \"{}\" in the library \"{}\" already exists locally or in another library. Please remove or rename duplicate collection entries to avoid conflicts.",
                    collection.name, collection.library_name
                ));
            }

            let variables = match store.library_variables(&collection.key).await {
                Ok(variables) => variables,
                Err(e) => {
                    report.warning(format!(
                        "Failed to list variables of the \"{}\" library collection: {}",
                        collection.name, e
                    ));
                    Vec::new()
                }
            };

            for variable in variables {
                let name = target_name_to_token(&variable.name);
                match self.variables.get(&name) {
                    Some(TargetVariable::Remote(_)) => report.warning(format!(
                        "The variable \"{}\" in the \"{}\" collection library already exists in another variables library. Please remove or rename duplicated variable entries to avoid conflicts.",
                        variable.name, collection.name
                    )),
                    Some(TargetVariable::Local(_)) => report.warning(format!(
                        "The variable \"{}\" in the \"{}\" collection library already exists in the local variables. Please remove or rename duplicated variable entries to avoid conflicts.",
                        variable.name, collection.name
                    )),
                    None => {
                        self.variables.insert(name, TargetVariable::Remote(variable));
                    }
                }
            }

            if !duplicate {
                self.collections
                    .insert(collection.name.clone(), TargetCollection::Remote(collection));
            }
        }
    }

    /// Whether the store offered library enumeration
    pub fn library_available(&self) -> bool {
        self.library_available
    }

    /// Look up a variable by token name.
    pub fn variable(&self, name: &str) -> Option<&TargetVariable> {
        self.variables.get(name)
    }

    /// Look up a collection by name.
    pub fn collection(&self, name: &str) -> Option<&TargetCollection> {
        self.collections.get(name)
    }

    /// Every token name in the merged namespace, in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Token names of locally owned variables only
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .filter(|(_, v)| v.is_local())
            .map(|(name, _)| name.as_str())
    }

    /// Number of variables in the merged namespace
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the merged namespace is empty
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Record a collection created during the import.
    pub(crate) fn insert_collection(&mut self, collection: Collection) {
        self.collections
            .insert(collection.name.clone(), TargetCollection::Local(collection));
    }

    /// Record a mode added to a local collection during the import.
    pub(crate) fn insert_mode(&mut self, collection: &CollectionId, mode: CollectionMode) {
        let cached = self.collections.values_mut().find_map(|c| match c {
            TargetCollection::Local(local) if &local.id == collection => Some(local),
            _ => None,
        });
        if let Some(local) = cached {
            local.modes.push(mode);
        }
    }

    /// Record a variable created during the import.
    pub(crate) fn insert_variable(&mut self, name: String, variable: Variable) {
        self.variables.insert(name, TargetVariable::Local(variable));
    }

    /// Mutable access to a local variable's cached state.
    pub(crate) fn local_variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        match self.variables.get_mut(name) {
            Some(TargetVariable::Local(variable)) => Some(variable),
            _ => None,
        }
    }
}
