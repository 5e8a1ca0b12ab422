//! # Configuration
//!
//! Vault configuration is managed by [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `ORGV_FILE_EXT`.
//! 2. **Vault config file**: `orgv.toml` in the vault root.
//! 3. **Compiled defaults** via `#[config(default = ...)]`.
//!
//! The vault root itself is resolved separately (it decides where the config
//! file lives): an explicit path from the caller, the `ORG_DIR` environment
//! variable, or `~/org`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `file_ext` | `.org` | Extension of outline documents in the vault |
//! | `todo_keywords` | `["TODO", "IN-PROGRESS"]` | Keywords marking open items |
//! | `done_keywords` | `["DONE"]` | Keywords marking completed items |

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::{OrgError, Result};

fn default_todo_keywords() -> Vec<String> {
    vec!["TODO".to_string(), "IN-PROGRESS".to_string()]
}

fn default_done_keywords() -> Vec<String> {
    vec!["DONE".to_string()]
}

/// Configuration for a vault, stored in `orgv.toml` at the vault root.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Extension of outline documents (e.g. ".org", ".txt")
    #[config(env = "ORGV_FILE_EXT", default = ".org")]
    pub file_ext: String,

    /// Keywords recognized as open TODO states on heading lines.
    /// When absent, defaults to ["TODO", "IN-PROGRESS"].
    pub todo_keywords: Option<Vec<String>>,

    /// Keywords recognized as completed states.
    /// When absent, defaults to ["DONE"].
    pub done_keywords: Option<Vec<String>>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            file_ext: ".org".to_string(),
            todo_keywords: None,
            done_keywords: None,
        }
    }
}

impl VaultConfig {
    /// Load configuration for a vault, layering env vars over `orgv.toml`
    /// over compiled defaults. A missing config file is not an error.
    pub fn load(vault_root: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(vault_root.join("orgv.toml"))
            .load()
            .map_err(|e| OrgError::Config(e.to_string()))
    }

    /// Get the file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }

    /// Open TODO keywords, using defaults if not configured.
    pub fn todo_keywords(&self) -> Vec<String> {
        self.todo_keywords
            .clone()
            .unwrap_or_else(default_todo_keywords)
    }

    /// Completed-state keywords, using defaults if not configured.
    pub fn done_keywords(&self) -> Vec<String> {
        self.done_keywords
            .clone()
            .unwrap_or_else(default_done_keywords)
    }

    /// Every recognized keyword, open and done alike.
    pub fn all_keywords(&self) -> Vec<String> {
        let mut all = self.todo_keywords();
        all.extend(self.done_keywords());
        all
    }

    /// Whether `word` is a recognized TODO keyword (open or done).
    pub fn is_keyword(&self, word: &str) -> bool {
        self.todo_keywords().iter().any(|k| k == word)
            || self.done_keywords().iter().any(|k| k == word)
    }

    /// Whether `word` marks a completed item.
    pub fn is_done_keyword(&self, word: &str) -> bool {
        self.done_keywords().iter().any(|k| k == word)
    }
}

/// Resolve the vault root: `ORG_DIR` if set, otherwise `~/org`.
pub fn default_vault_root() -> PathBuf {
    if let Ok(dir) = std::env::var("ORG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join("org"))
        .unwrap_or_else(|| PathBuf::from("org"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.file_ext(), ".org");
        assert_eq!(config.todo_keywords(), vec!["TODO", "IN-PROGRESS"]);
        assert_eq!(config.done_keywords(), vec!["DONE"]);
    }

    #[test]
    fn file_ext_normalized_to_dot() {
        let config = VaultConfig {
            file_ext: "txt".to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_ext(), ".txt");
    }

    #[test]
    fn keyword_recognition() {
        let config = VaultConfig::default();
        assert!(config.is_keyword("TODO"));
        assert!(config.is_keyword("DONE"));
        assert!(!config.is_keyword("MAYBE"));
        assert!(config.is_done_keyword("DONE"));
        assert!(!config.is_done_keyword("TODO"));
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let config = VaultConfig {
            todo_keywords: Some(vec!["NEXT".to_string(), "WAITING".to_string()]),
            done_keywords: Some(vec!["CANCELLED".to_string()]),
            ..Default::default()
        };
        assert!(config.is_keyword("NEXT"));
        assert!(!config.is_keyword("TODO"));
        assert_eq!(
            config.all_keywords(),
            vec!["NEXT", "WAITING", "CANCELLED"]
        );
    }

    #[test]
    fn load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("orgv.toml"),
            "file_ext = \".txt\"\ntodo_keywords = [\"NEXT\"]\n",
        )
        .unwrap();

        let config = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(config.file_ext(), ".txt");
        assert_eq!(config.todo_keywords(), vec!["NEXT"]);
        // Unset list falls back to defaults
        assert_eq!(config.done_keywords(), vec!["DONE"]);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(config, VaultConfig::default());
    }
}
