//! Import engine for design token variables
//!
//! This crate reconciles a set of token documents against a variable store:
//!
//! - **Inventory**: merged view of local and library variables, with collision warnings
//! - **Aggregation**: flattening documents per manifest mode into per-name aggregates
//! - **Diff**: presence-only added/updated/removed partitions
//! - **Resolution**: the queued alias fixpoint that creates and updates variables
//! - **Reporting**: an ordered list of [`OperationResult`]s for dry runs and real imports
//!
//! # Architecture
//!
//! ```text
//!   manifest ──> aggregation ──> diff ──┬──> dry-run report
//!                                       │
//!   inventory ──────────────────────────┴──> queue ──> fixpoint ──> store
//! ```
//!
//! The store is consumed only through the [`VariableStore`] trait;
//! [`MemoryStore`] is the in-process implementation used by the CLI and tests.
//!
//! # Example
//!
//! ```ignore
//! use tokens_core::{ImportOptions, Importer, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let outcome = Importer::new(&mut store)
//!     .import(&documents, None, ImportOptions { dry_run: true })
//!     .await;
//! for result in outcome.report.results() {
//!     println!("{}: {}", result.kind, result.text);
//! }
//! ```

pub mod aggregate;
pub mod diff;
pub mod error;
pub mod import;
pub mod inventory;
pub mod manifest;
pub mod report;
pub mod source;
pub mod store;

pub use aggregate::{AggregateError, AggregateErrorCode, AggregatedVariable, Aggregation};
pub use diff::NameDiff;
pub use error::{Error, Result};
pub use import::{
    FixpointStats, ImportOptions, ImportOutcome, Importer, QueuedUpdate, import_tokens,
};
pub use inventory::{Inventory, TargetCollection, TargetVariable};
pub use manifest::{DEFAULT_MODE, default_manifest, resolve_manifest};
pub use report::{ImportReport, OperationResult, ResultKind};
pub use source::ImportSource;
pub use store::{
    Collection, CollectionId, CollectionMode, LibraryCollection, LibraryVariable, MemoryStore,
    ModeId, StoreConfig, StoreError, StoreResult, Variable, VariableId, VariableStore,
    VariableValue,
};
