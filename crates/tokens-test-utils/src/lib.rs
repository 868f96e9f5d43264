//! Shared test utilities for the design token workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`documents`]: token documents and manifests from inline JSON
//! - [`store`]: [`StoreBuilder`] for seeding a [`MemoryStore`](tokens_core::MemoryStore)
//! - [`files`]: [`TestFiles`] for tests that read inputs from disk

pub mod documents;
pub mod files;
pub mod store;

pub use documents::{document, documents, manifest, token};
pub use files::TestFiles;
pub use store::StoreBuilder;
