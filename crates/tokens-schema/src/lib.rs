//! Design token document model.
//!
//! This crate describes the input side of an import:
//!
//! - **Documents**: nested DTCG-style JSON trees of groups and leaf tokens
//! - **Tokens**: typed leaves carrying a literal value or an alias reference
//! - **Manifests**: which documents feed which collection and mode
//! - **Colors**: parsing of the color notations tokens are written in
//!
//! Nothing here talks to a variable store; see `tokens-core` for the engine.

pub mod alias;
pub mod color;
pub mod document;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod token;

pub use alias::alias_target;
pub use color::Rgba;
pub use document::TokenDocument;
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestCollection};
pub use naming::{target_name_to_token, token_name_to_target};
pub use token::{CodeSyntaxPlatform, ResolvedType, Token, TokenType, ALL_SCOPES, TARGET_EXTENSION};
