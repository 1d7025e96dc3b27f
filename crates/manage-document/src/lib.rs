//! # Manage Document - Metadata Document Utilities
//!
//! The metadata registry console edits SAML and OIDC entities (service
//! providers, identity providers, relying parties, resource servers) as JSON
//! documents. Before an edit is sent to the registry API it passes through a
//! few pure transformations, collected in this crate.
//!
//! ## Purpose
//!
//! 1. **Key-Path Expansion** - Turns flattened form data with dotted keys
//!    back into nested documents.
//!
//! 2. **Change Extraction** - Selects the original values addressed by an
//!    edit, giving the "before" side of a change.
//!
//! 3. **Deterministic Sorting** - Orders every list in a document in place
//!    so that rendering and comparison are stable.
//!
//! 4. **Canonical Forms** - Canonical rendering, fingerprints and
//!    order-insensitive equivalence of documents.
//!
//! ## Data Flow
//!
//! ```text
//!   flat form values           last fetched document
//!         │                              │
//!         ▼                              │
//!   ┌───────────┐   candidate   ┌────────▼────────┐
//!   │  EXPAND   │──────────────▶│ EXTRACT CHANGES │──▶ current values
//!   └───────────┘               └─────────────────┘
//!
//!   ┌───────────┐               ┌─────────────────┐
//!   │   SORT    │──────────────▶│  CANONICALIZE   │──▶ fingerprint / equality
//!   └───────────┘               └─────────────────┘
//! ```
//!
//! None of the operations performs I/O or holds state. The sorter is the only
//! mutator and takes its document by exclusive borrow.
//!
//! ## Usage
//!
//! ```rust
//! use manage_document::{diff, expand, sort_in_place};
//! use serde_json::json;
//!
//! let stored = json!({
//!     "entityid": "https://sp.example.org",
//!     "metaDataFields": {"name:en": "Example SP", "accessTokenValidity": 3600},
//!     "allowedEntities": [{"name": "https://idp2.example.org"}, {"name": "https://idp1.example.org"}]
//! });
//!
//! let form = json!({"metaDataFields.accessTokenValidity": 86400});
//! let candidate = expand(form.as_object().unwrap());
//!
//! let before = diff(stored.as_object().unwrap(), &candidate);
//! assert_eq!(
//!     serde_json::Value::Object(before),
//!     json!({"metaDataFields": {"accessTokenValidity": 3600}})
//! );
//!
//! let mut view = stored.as_object().unwrap().clone();
//! sort_in_place(&mut view);
//! assert_eq!(view["allowedEntities"][0]["name"], "https://idp1.example.org");
//! ```

pub mod canonicalize;
pub mod diff;
pub mod expand;
pub mod helpers;
pub mod models;
pub mod sort;

pub use canonicalize::{canonicalize, documents_equivalent, fingerprint, fingerprint_hex};
pub use diff::{diff, diff_documents, is_considered_present};
pub use expand::{expand, expand_document};
pub use helpers::{capitalize, is_empty, valid_scope};
pub use models::{parse_mapping, Document, DocumentError, Fingerprint, Mapping, Result};
pub use sort::{sort_document, sort_in_place};
