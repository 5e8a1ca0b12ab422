//! # Command Layer
//!
//! The core business logic, one module per exposed operation. Commands are
//! pure functions over a [`VaultStore`](crate::store::VaultStore): they take
//! Rust values, return Rust values, and never touch stdout, stderr, or
//! process exits. The UI layer decides how to render what they return.
//!
//! Reads parse the target document fresh; writes parse fresh, apply exactly
//! one logical change, re-render the whole tree and persist it. Nothing is
//! cached across operations, so there is no staleness to manage.
//!
//! ## Command Modules
//!
//! - [`list`]: list vault documents
//! - [`read`]: full document text
//! - [`headings`]: outline listing and single-heading reads
//! - [`search`]: vault-wide text/ID search
//! - [`agenda`]: vault-wide TODO/schedule extraction
//! - [`create`]: add a new document
//! - [`add_heading`]: append a heading to a document
//! - [`modify`]: apply a [`HeadingChange`](crate::model::HeadingChange)
//!
//! ## Testing Strategy
//!
//! This is where the lion's share of testing lives. Command tests run
//! against [`InMemoryVault`](crate::store::memory::InMemoryVault), covering
//! logic branches and error conditions without filesystem dependencies.

use std::path::PathBuf;

use serde::Serialize;

pub mod add_heading;
pub mod agenda;
pub mod create;
pub mod headings;
pub mod list;
pub mod modify;
pub mod read;
pub mod search;

/// A per-document failure collected by a vault-wide scan. Carried alongside
/// results instead of aborting the operation.
#[derive(Debug, Clone, Serialize)]
pub struct DocFailure {
    pub path: PathBuf,
    pub reason: String,
}
