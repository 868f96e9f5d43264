//! Import orchestration
//!
//! [`Importer`] ties the stages together for one run: inventory, manifest
//! resolution, aggregation, diff, and then either the dry-run preview or the
//! queued fixpoint against the store.

mod coerce;
mod fixpoint;
mod queue;

use indexmap::IndexMap;
use tokens_schema::{Manifest, TokenDocument};

use crate::aggregate::Aggregation;
use crate::diff::NameDiff;
use crate::inventory::Inventory;
use crate::manifest::resolve_manifest;
use crate::report::{ImportReport, OperationResult};
use crate::store::VariableStore;

pub use coerce::{CoercionError, coerce_literal};
pub use fixpoint::FixpointStats;
pub use queue::{QueuedUpdate, build_queue};

/// Options for one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Report what would change without touching the store
    pub dry_run: bool,
}

/// Everything an import run produced
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub report: ImportReport,
    /// Import names against the whole namespace
    pub diff: NameDiff,
    /// Import names against local variables only; dry runs only
    pub local_diff: Option<NameDiff>,
    /// Fixpoint counters; applied runs only
    pub stats: Option<FixpointStats>,
}

/// Runs imports against a store it borrows exclusively
pub struct Importer<'s, S: VariableStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: VariableStore + ?Sized> Importer<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Import `documents`, grouped by `manifest` or by the default one.
    ///
    /// Never fails: every problem is reported in the outcome's report.
    pub async fn import(
        &mut self,
        documents: &IndexMap<String, TokenDocument>,
        manifest: Option<Manifest>,
        options: ImportOptions,
    ) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        if !self.store.supports_variables() {
            tracing::warn!("Store does not support variables");
            outcome
                .report
                .error("Variables are not supported by this store. Update the host to enable variables.");
            return outcome;
        }

        tracing::info!(
            documents = documents.len(),
            dry_run = options.dry_run,
            "Starting import"
        );

        let mut inventory = Inventory::build(&*self.store, &mut outcome.report).await;
        let manifest = resolve_manifest(manifest, documents.keys().cloned());
        let aggregation = Aggregation::build(&manifest, documents);
        report_aggregation(&aggregation, &mut outcome.report);

        outcome.diff = NameDiff::compute(inventory.names(), aggregation.candidate_names());

        if options.dry_run {
            let local_diff =
                NameDiff::compute(inventory.local_names(), aggregation.candidate_names());
            outcome.report.push_dry_run(&outcome.diff, &local_diff);
            outcome.local_diff = Some(local_diff);
            tracing::info!(
                added = outcome.diff.added.len(),
                updated = outcome.diff.updated.len(),
                "Dry run finished"
            );
            return outcome;
        }

        let queue = build_queue(&aggregation, &outcome.diff);
        tracing::debug!(items = queue.len(), "Built update queue");

        let stats = fixpoint::Resolver::new(&mut *self.store, &mut inventory, &mut outcome.report)
            .run(queue)
            .await;
        outcome.report.push_apply_summary(stats.created, stats.updated);

        tracing::info!(
            created = stats.created,
            updated = stats.updated,
            passes = stats.passes,
            unresolved = stats.unresolved,
            "Import finished"
        );
        outcome.stats = Some(stats);
        outcome
    }
}

fn report_aggregation(aggregation: &Aggregation, report: &mut ImportReport) {
    for missing in aggregation.missing_documents() {
        report.warning(format!(
            "The manifest lists \"{}\" for mode {} of collection {}, but no such document was supplied.",
            missing.document, missing.mode, missing.collection
        ));
    }
    for (name, error) in aggregation.errors() {
        report.warning(format!("Skipped \"{}\" ({}): {}", name, error.code, error.message));
    }
}

/// Run one import and return only its results.
pub async fn import_tokens<S>(
    store: &mut S,
    documents: &IndexMap<String, TokenDocument>,
    manifest: Option<Manifest>,
    options: ImportOptions,
) -> Vec<OperationResult>
where
    S: VariableStore + ?Sized,
{
    Importer::new(store)
        .import(documents, manifest, options)
        .await
        .report
        .into_results()
}
