use std::path::Path;

use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::store::VaultStore;

/// Create a new document with the given initial content. Refuses to
/// overwrite an existing document; parent directories are created as needed
/// by the store.
pub fn run<S: VaultStore>(
    store: &mut S,
    config: &VaultConfig,
    path: &Path,
    content: &str,
) -> Result<()> {
    let ext = config.file_ext();
    if !path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&ext))
    {
        return Err(OrgError::InvalidInput(format!(
            "document path must end in '{}': {}",
            ext,
            path.display()
        )));
    }
    store.create_document(path, content)
}
