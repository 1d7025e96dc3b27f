//! # Manage Core
//!
//! Orchestration layer of the metadata registry console. Builds on the pure
//! document utilities in `manage_document` and adds the registry-facing
//! pieces: change requests, auto-refresh planning and schema pruning.
//!
//! ## Components
//!
//! | Component | Module | Purpose |
//! |-----------|--------|---------|
//! | Change requests | [`change_request`] | Change requests from form edits, with before values |
//! | Auto-refresh | [`refresh`] | Which metadata fields a refresh may update or remove |
//! | Schema pruning | [`schema`] | Drop fields an entity-type schema does not declare |
//! | Entity types | [`entity`] | Registry collections and well-known keys |
//! | Configuration | [`config`] | TOML configuration with defaults |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MANAGE CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │                    ┌─────────────────┐                      │
//! │                    │     Console     │  ← Facade            │
//! │                    └────────┬────────┘                      │
//! │                             │                               │
//! │         ┌───────────────────┼───────────────────┐           │
//! │         ▼                   ▼                   ▼           │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   Change    │    │    Auto     │    │   Schema    │      │
//! │  │  Requests   │    │   Refresh   │    │   Pruning   │      │
//! │  └──────┬──────┘    └─────────────┘    └─────────────┘      │
//! │         │                                                   │
//! │         ▼                                                   │
//! │  ┌─────────────────────────────────────────────────┐        │
//! │  │   manage_document: expand / diff / sort         │        │
//! │  └─────────────────────────────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here performs network or storage I/O. Fetching entities, importing
//! metadata URLs and submitting change requests belong to the caller.

pub mod change_request;
pub mod config;
mod console;
pub mod entity;
mod error;
pub mod refresh;
pub mod schema;

pub use change_request::{AuditData, ChangeRequestBuilder, ChangeTarget, MetaDataChangeRequest};
pub use config::ManageConfig;
pub use console::Console;
pub use entity::EntityType;
pub use error::ManageError;
pub use refresh::{RefreshOutcome, RefreshPlan, SkipReason};

// Re-export document types for convenience
pub use manage_document::{Document, Mapping};

/// Core result type for console operations.
pub type Result<T> = std::result::Result<T, ManageError>;

#[cfg(test)]
mod tests;
