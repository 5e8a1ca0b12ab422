use std::fs;
use std::path::{Component, Path, PathBuf};

use super::VaultStore;
use crate::error::{OrgError, Result};

/// Production store over a vault root directory.
pub struct FileVault {
    root: PathBuf,
    file_ext: String,
}

impl FileVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_ext: ".org".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault-relative path, rejecting anything that would escape
    /// the vault root.
    fn full_path(&self, rel: &Path) -> Result<PathBuf> {
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(OrgError::InvalidInput(format!(
                "path escapes the vault: {}",
                rel.display()
            )));
        }
        Ok(self.root.join(rel))
    }

    fn collect_documents(&self, dir: &Path, acc: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.collect_documents(&path, acc)?;
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.file_ext))
            {
                let rel = path
                    .strip_prefix(&self.root)
                    .unwrap_or(&path)
                    .to_path_buf();
                acc.push(rel);
            }
        }
        Ok(())
    }
}

impl VaultStore for FileVault {
    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            log::debug!("vault root {} does not exist yet", self.root.display());
            return Ok(Vec::new());
        }
        let mut docs = Vec::new();
        self.collect_documents(&self.root, &mut docs)?;
        docs.sort();
        Ok(docs)
    }

    fn read_document(&self, path: &Path) -> Result<String> {
        let full = self.full_path(path)?;
        match fs::read_to_string(&full) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OrgError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(OrgError::Io(e)),
        }
    }

    fn write_document(&mut self, path: &Path, contents: &str) -> Result<()> {
        let full = self.full_path(path)?;
        if !full.exists() {
            return Err(OrgError::NotFound(path.to_path_buf()));
        }
        log::debug!("writing {} ({} bytes)", full.display(), contents.len());
        fs::write(&full, contents)?;
        Ok(())
    }

    fn create_document(&mut self, path: &Path, contents: &str) -> Result<()> {
        let full = self.full_path(path)?;
        if full.exists() {
            return Err(OrgError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        log::debug!("creating {}", full.display());
        fs::write(&full, contents)?;
        Ok(())
    }

    fn document_exists(&self, path: &Path) -> bool {
        self.full_path(path).map(|p| p.exists()).unwrap_or(false)
    }
}
