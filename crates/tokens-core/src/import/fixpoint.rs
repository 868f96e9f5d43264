//! Alias resolution fixpoint
//!
//! Queued updates are applied in passes. An alias whose target does not
//! exist yet is deferred to the next pass; everything else either lands or
//! fails for good. Passes repeat until one makes no progress, so a chain of
//! `n` aliases declared in the worst order needs at most `n` passes.

use std::collections::HashMap;

use serde::Serialize;
use tokens_schema::{ALL_SCOPES, ResolvedType, token_name_to_target};

use super::coerce::coerce_literal;
use super::queue::QueuedUpdate;
use crate::inventory::{Inventory, TargetCollection, TargetVariable};
use crate::report::ImportReport;
use crate::store::{
    Collection, CollectionMode, ModeId, StoreError, VariableId, VariableStore, VariableValue,
};

/// Counters describing a finished fixpoint run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixpointStats {
    /// Passes started over the queue
    pub passes: usize,
    /// Variables created
    pub created: usize,
    /// Updates applied to variables that already existed
    pub updated: usize,
    /// Aliases still unresolved when the loop stopped
    pub unresolved: usize,
    /// Whether a refused mode creation stopped the run
    pub aborted: bool,
    /// Items never attempted because the run stopped
    pub skipped: usize,
}

/// What happened to one queued item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    /// Value written
    Applied,
    /// Alias target missing; retry next pass
    Deferred,
    /// Failed for good; already reported
    Dropped,
    /// The store refused a new mode; stop everything
    AbortPass,
}

/// Single writer of the store and inventory for the duration of a run
pub(crate) struct Resolver<'a, S: VariableStore + ?Sized> {
    store: &'a mut S,
    inventory: &'a mut Inventory,
    report: &'a mut ImportReport,
    /// Library variables imported during this run, by token name
    imported: HashMap<String, VariableId>,
    created: usize,
    updated: usize,
}

impl<'a, S: VariableStore + ?Sized> Resolver<'a, S> {
    pub(crate) fn new(
        store: &'a mut S,
        inventory: &'a mut Inventory,
        report: &'a mut ImportReport,
    ) -> Self {
        Self {
            store,
            inventory,
            report,
            imported: HashMap::new(),
            created: 0,
            updated: 0,
        }
    }

    /// Drive `queue` until it is empty or a pass makes no progress.
    pub(crate) async fn run(mut self, mut queue: Vec<QueuedUpdate>) -> FixpointStats {
        let mut stats = FixpointStats::default();

        while !queue.is_empty() {
            stats.passes += 1;
            let mut retry = Vec::new();
            let mut progress = false;
            let mut items = queue.into_iter();

            while let Some(item) = items.next() {
                match self.process(&item).await {
                    ItemOutcome::Deferred => retry.push(item),
                    ItemOutcome::Applied | ItemOutcome::Dropped => progress = true,
                    ItemOutcome::AbortPass => {
                        stats.aborted = true;
                        stats.skipped = items.len() + retry.len();
                        break;
                    }
                }
            }

            tracing::debug!(
                pass = stats.passes,
                retry = retry.len(),
                progress,
                "Finished fixpoint pass"
            );
            queue = retry;
            if stats.aborted || !progress {
                break;
            }
        }

        if stats.aborted {
            tracing::warn!(skipped = stats.skipped, "Import stopped after a refused mode");
            if stats.skipped > 0 {
                self.report.warning(format!(
                    "{} queued updates were not attempted because the import stopped early.",
                    stats.skipped
                ));
            }
        } else {
            stats.unresolved = queue.len();
            for item in &queue {
                self.report_unresolved(item);
            }
        }

        stats.created = self.created;
        stats.updated = self.updated;
        stats
    }

    fn report_unresolved(&mut self, item: &QueuedUpdate) {
        let target = item
            .alias_target()
            .map(token_name_to_target)
            .unwrap_or_else(|| "another token".to_string());
        let reason = if self.inventory.library_available() {
            "that doesn't exist"
        } else {
            "it wasn't found and may be in a library that is not available"
        };
        self.report.error(format!(
            "Unable to add \"{}\" mode {} because it is an alias of {} but {}.",
            item.token_name, item.mode_name, target, reason
        ));
    }

    async fn process(&mut self, item: &QueuedUpdate) -> ItemOutcome {
        let Some(resolved_type) = item.token.token_type.resolved_type() else {
            self.report.info(format!(
                "Unable to add \"{}\" mode {} because {} tokens aren't supported.",
                item.token_name, item.mode_name, item.token.token_type
            ));
            return ItemOutcome::Dropped;
        };

        let alias = match item.alias_target() {
            Some(target) => match self.inventory.variable(target) {
                Some(variable) => Some((target.to_string(), variable.clone())),
                None => {
                    tracing::debug!(name = %item.token_name, %target, "Alias target missing, deferring");
                    return ItemOutcome::Deferred;
                }
            },
            None => None,
        };

        let (variable_id, collection, fresh_mode) = match self.resolve_variable(item, resolved_type)
        {
            Some(resolved) => resolved,
            None => return ItemOutcome::Dropped,
        };

        let mode_id = match fresh_mode {
            Some(mode_id) => mode_id,
            None => match self.resolve_mode(item, &collection) {
                Ok(mode_id) => mode_id,
                Err(outcome) => return outcome,
            },
        };

        let value = match alias {
            Some((target_name, target)) => match self.link_target(&target_name, target).await {
                Some(id) => VariableValue::Alias(id),
                None => return ItemOutcome::Dropped,
            },
            None => match coerce_literal(&item.token) {
                Ok(value) => value,
                Err(e) => {
                    self.report.error(format!(
                        "{}: \"{}\" {} = {}",
                        e, item.token_name, item.target_name, e.value
                    ));
                    return ItemOutcome::Dropped;
                }
            },
        };

        if let Err(e) = self.store.set_value(&variable_id, &mode_id, value.clone()) {
            self.report.error(format!(
                "Failed to set {} for mode {}: {}",
                item.target_name, item.mode_name, e
            ));
            return ItemOutcome::Dropped;
        }
        if let Some(cached) = self.inventory.local_variable_mut(&item.token_name) {
            cached.values.insert(mode_id, value);
        }

        self.apply_attributes(item, &variable_id);
        tracing::debug!(name = %item.token_name, mode = %item.mode_name, "Applied update");
        ItemOutcome::Applied
    }

    /// Find or create the variable, its collection and, for a brand new
    /// collection, its renamed default mode.
    fn resolve_variable(
        &mut self,
        item: &QueuedUpdate,
        resolved_type: ResolvedType,
    ) -> Option<(VariableId, Collection, Option<ModeId>)> {
        match self.inventory.variable(&item.token_name) {
            Some(TargetVariable::Remote(_)) => {
                self.report.error(format!(
                    "Failed to update {} because it's defined in a different library.",
                    item.target_name
                ));
                None
            }
            Some(TargetVariable::Local(variable)) => {
                let (id, collection_id) = (variable.id.clone(), variable.collection_id.clone());
                match self.store.collection(&collection_id) {
                    Ok(Some(collection)) => {
                        self.updated += 1;
                        Some((id, collection, None))
                    }
                    Ok(None) => {
                        self.report.error(format!(
                            "Failed to update {} because its collection no longer exists.",
                            item.target_name
                        ));
                        None
                    }
                    Err(e) => {
                        self.report
                            .error(format!("Failed to update {}: {}", item.target_name, e));
                        None
                    }
                }
            }
            None => {
                let (collection, fresh_mode) = self.resolve_collection(item)?;
                match self
                    .store
                    .create_variable(&item.target_name, &collection.id, resolved_type)
                {
                    Ok(variable) => {
                        let id = variable.id.clone();
                        self.inventory
                            .insert_variable(item.token_name.clone(), variable);
                        self.created += 1;
                        tracing::debug!(name = %item.target_name, collection = %collection.name, "Created variable");
                        Some((id, collection, fresh_mode))
                    }
                    Err(e) => {
                        self.report
                            .error(format!("Failed to create {}: {}", item.target_name, e));
                        None
                    }
                }
            }
        }
    }

    fn resolve_collection(&mut self, item: &QueuedUpdate) -> Option<(Collection, Option<ModeId>)> {
        match self.inventory.collection(&item.collection_name) {
            Some(TargetCollection::Remote(_)) => {
                self.report.error(format!(
                    "Failed to create {} because it's defined in a different library.",
                    item.target_name
                ));
                None
            }
            Some(TargetCollection::Local(cached)) => {
                let id = cached.id.clone();
                match self.store.collection(&id) {
                    Ok(Some(collection)) => Some((collection, None)),
                    Ok(None) => {
                        self.report.error(format!(
                            "Failed to create {} because collection {} no longer exists.",
                            item.target_name, item.collection_name
                        ));
                        None
                    }
                    Err(e) => {
                        self.report
                            .error(format!("Failed to create {}: {}", item.target_name, e));
                        None
                    }
                }
            }
            None => match self.create_collection(item) {
                Ok(created) => Some(created),
                Err(e) => {
                    self.report.error(format!(
                        "Failed to create collection {}: {}",
                        item.collection_name, e
                    ));
                    None
                }
            },
        }
    }

    /// New collections start with one mode, renamed after the item's mode.
    fn create_collection(
        &mut self,
        item: &QueuedUpdate,
    ) -> Result<(Collection, Option<ModeId>), StoreError> {
        let mut collection = self.store.create_collection(&item.collection_name)?;
        let default_mode = collection
            .modes
            .first_mut()
            .ok_or_else(|| StoreError::Rejected {
                message: "new collection has no default mode".to_string(),
            })?;
        self.store
            .rename_mode(&collection.id, &default_mode.id, &item.mode_name)?;
        default_mode.name = item.mode_name.clone();
        let mode_id = default_mode.id.clone();

        tracing::info!(collection = %collection.name, mode = %item.mode_name, "Created collection");
        self.inventory.insert_collection(collection.clone());
        Ok((collection, Some(mode_id)))
    }

    fn resolve_mode(
        &mut self,
        item: &QueuedUpdate,
        collection: &Collection,
    ) -> Result<ModeId, ItemOutcome> {
        if let Some(mode) = collection.mode_named(&item.mode_name) {
            return Ok(mode.id.clone());
        }

        match self.store.add_mode(&collection.id, &item.mode_name) {
            Ok(mode_id) => {
                tracing::debug!(collection = %collection.name, mode = %item.mode_name, "Added mode");
                self.inventory.insert_mode(
                    &collection.id,
                    CollectionMode {
                        id: mode_id.clone(),
                        name: item.mode_name.clone(),
                    },
                );
                Ok(mode_id)
            }
            Err(e) => {
                tracing::warn!(collection = %collection.name, mode = %item.mode_name, error = %e, "Mode refused");
                self.report.error(format!(
                    "Failed to add a variable mode for {}. You may be at the limit of what your account currently allows. (You already have {}.)",
                    item.mode_name,
                    collection.modes.len()
                ));
                Err(ItemOutcome::AbortPass)
            }
        }
    }

    /// Local handle for an alias target, importing library variables once.
    async fn link_target(&mut self, target_name: &str, target: TargetVariable) -> Option<VariableId> {
        let library = match target {
            TargetVariable::Local(variable) => return Some(variable.id),
            TargetVariable::Remote(library) => library,
        };
        if let Some(id) = self.imported.get(target_name) {
            return Some(id.clone());
        }

        match self.store.import_variable_by_key(&library.key).await {
            Ok(variable) => {
                tracing::debug!(name = %library.name, "Imported library variable");
                self.imported
                    .insert(target_name.to_string(), variable.id.clone());
                Some(variable.id)
            }
            Err(e) => {
                self.report.error(format!(
                    "Failed to import {} from its library: {}",
                    library.name, e
                ));
                None
            }
        }
    }

    /// Description, scopes and code syntax. Failures here are reported but
    /// do not undo the value already written.
    fn apply_attributes(&mut self, item: &QueuedUpdate, variable_id: &VariableId) {
        let Some(cached) = self.inventory.local_variable_mut(&item.token_name) else {
            return;
        };

        let description = item
            .token
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(cached.description.as_str())
            .to_string();
        match self.store.set_description(variable_id, &description) {
            Ok(()) => cached.description = description,
            Err(e) => self.report.error(format!(
                "Failed to set the description of {}: {}",
                item.target_name, e
            )),
        }

        if cached.resolved_type.supports_scopes() {
            let scopes = match item.token.scopes() {
                Some(scopes) => Some(scopes),
                None if cached.scopes.is_empty() => Some(vec![ALL_SCOPES.to_string()]),
                None => None,
            };
            if let Some(scopes) = scopes {
                match self.store.set_scopes(variable_id, &scopes) {
                    Ok(()) => cached.scopes = scopes,
                    Err(e) => self.report.error(format!(
                        "Failed to set the scopes of {}: {}",
                        item.target_name, e
                    )),
                }
            }
        }

        for (platform, syntax) in item.token.code_syntax() {
            match self.store.set_code_syntax(variable_id, platform, &syntax) {
                Ok(()) => {
                    cached.code_syntax.insert(platform, syntax);
                }
                Err(e) => self.report.error(format!(
                    "Failed to set the {} code syntax of {}: {}",
                    platform.key(),
                    item.target_name,
                    e
                )),
            }
        }
    }
}
