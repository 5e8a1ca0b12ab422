//! # Storage Layer
//!
//! The [`VaultStore`] trait abstracts the vault directory: listing outline
//! documents and reading/writing their bytes. The vault itself is the only
//! persisted state; no secondary index files exist, all addressing is rebuilt
//! in memory per operation.
//!
//! Two implementations:
//!
//! - [`fs::FileVault`]: production store over a vault root directory.
//! - [`memory::InMemoryVault`]: for testing logic without filesystem I/O.
//!
//! Paths handed to and returned by a store are always relative to the vault
//! root. Listing order is lexicographic over those relative paths, which is
//! the deterministic "vault order" search and agenda results are grouped by.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for vault document storage.
pub trait VaultStore {
    /// All outline documents, as sorted vault-relative paths.
    fn list_documents(&self) -> Result<Vec<PathBuf>>;

    /// Read a document's full text. Fails with `NotFound` if absent.
    fn read_document(&self, path: &Path) -> Result<String>;

    /// Overwrite an existing document's bytes.
    fn write_document(&mut self, path: &Path, contents: &str) -> Result<()>;

    /// Create a new document, failing with `AlreadyExists` if the path is
    /// taken. Missing parent directories are created.
    fn create_document(&mut self, path: &Path, contents: &str) -> Result<()>;

    fn document_exists(&self, path: &Path) -> bool;
}
