use std::path::Path;

use crate::error::Result;
use crate::store::VaultStore;

/// Full rendered text of one document, exactly as stored.
pub fn run<S: VaultStore>(store: &S, path: &Path) -> Result<String> {
    store.read_document(path)
}
