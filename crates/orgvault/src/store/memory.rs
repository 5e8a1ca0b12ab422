use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::VaultStore;
use crate::error::{OrgError, Result};

/// In-memory vault for testing logic without filesystem I/O. The `BTreeMap`
/// keeps documents in the same sorted order `FileVault` lists them in.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    documents: BTreeMap<PathBuf, String>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, builder-style.
    pub fn with_document(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.documents.insert(path.into(), contents.into());
        self
    }

    /// Direct access to stored bytes, for assertions.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.documents.get(path.as_ref()).map(String::as_str)
    }
}

impl VaultStore for InMemoryVault {
    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read_document(&self, path: &Path) -> Result<String> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| OrgError::NotFound(path.to_path_buf()))
    }

    fn write_document(&mut self, path: &Path, contents: &str) -> Result<()> {
        if !self.documents.contains_key(path) {
            return Err(OrgError::NotFound(path.to_path_buf()));
        }
        self.documents
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_document(&mut self, path: &Path, contents: &str) -> Result<()> {
        if self.documents.contains_key(path) {
            return Err(OrgError::AlreadyExists(path.to_path_buf()));
        }
        self.documents
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn document_exists(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }
}
