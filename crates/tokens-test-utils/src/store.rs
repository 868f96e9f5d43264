//! [`StoreBuilder`] for seeding in-memory stores.

use tokens_core::{CollectionId, MemoryStore, StoreConfig, VariableValue};
use tokens_schema::ResolvedType;

/// Fluent builder over [`MemoryStore`]
///
/// Variables are added to the most recently declared collection.
///
/// ```rust,no_run
/// use tokens_core::VariableValue;
/// use tokens_schema::ResolvedType;
/// use tokens_test_utils::StoreBuilder;
///
/// let store = StoreBuilder::new()
///     .collection("Primitives", &["Default"])
///     .variable("size/base", ResolvedType::Float, &[("Default", VariableValue::Float(4.0))])
///     .library("Brand", "Palette", &[("color/blue", ResolvedType::Color)])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct StoreBuilder {
    store: MemoryStore,
    current: Option<CollectionId>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of modes per collection.
    pub fn max_modes(mut self, limit: usize) -> Self {
        self.store.config_mut().max_modes = Some(limit);
        self
    }

    /// Disable team library access.
    pub fn without_library(mut self) -> Self {
        self.store.config_mut().library_enabled = false;
        self
    }

    /// Disable variable support entirely.
    pub fn without_variables(mut self) -> Self {
        self.store.config_mut().variables_enabled = false;
        self
    }

    /// Replace every capability at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        *self.store.config_mut() = config;
        self
    }

    /// Add a local collection and make it current.
    pub fn collection(mut self, name: &str, modes: &[&str]) -> Self {
        self.current = Some(self.store.insert_collection(name, modes));
        self
    }

    /// Add a local variable to the current collection.
    ///
    /// Panics when no collection was declared or the values are rejected.
    pub fn variable(
        mut self,
        name: &str,
        resolved_type: ResolvedType,
        values: &[(&str, VariableValue)],
    ) -> Self {
        let collection = self
            .current
            .clone()
            .expect("StoreBuilder::variable: declare a collection first");
        self.store
            .insert_variable(&collection, name, resolved_type, values)
            .unwrap_or_else(|e| panic!("StoreBuilder::variable {}: {}", name, e));
        self
    }

    /// Add a library collection with its variables.
    pub fn library(
        mut self,
        library_name: &str,
        collection: &str,
        variables: &[(&str, ResolvedType)],
    ) -> Self {
        let key = self.store.insert_library_collection(library_name, collection);
        for (name, resolved_type) in variables {
            self.store
                .insert_library_variable(&key, name, *resolved_type)
                .unwrap_or_else(|e| panic!("StoreBuilder::library {}: {}", name, e));
        }
        self
    }

    pub fn build(self) -> MemoryStore {
        self.store
    }
}
