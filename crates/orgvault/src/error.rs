use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrgError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Document already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Malformed outline in {path} (line {line}): {reason}")]
    MalformedStructure {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Heading not found: no segment matches '{0}'")]
    HeadingNotFound(String),

    #[error("No heading with ID '{0}'")]
    IdNotFound(String),

    #[error("Duplicate ID '{0}': IDs must be unique within a document")]
    DuplicateId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Vault scan failed, no document could be processed: {0}")]
    ScanFailed(String),
}

pub type Result<T> = std::result::Result<T, OrgError>;
