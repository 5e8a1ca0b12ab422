use std::path::PathBuf;

use crate::error::Result;
use crate::store::VaultStore;

pub fn run<S: VaultStore>(store: &S) -> Result<Vec<PathBuf>> {
    store.list_documents()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryVault;

    #[test]
    fn lists_in_sorted_order() {
        let store = InMemoryVault::new()
            .with_document("b.org", "* B\n")
            .with_document("a.org", "* A\n");
        let docs = run(&store).unwrap();
        assert_eq!(docs, vec![PathBuf::from("a.org"), PathBuf::from("b.org")]);
    }

    #[test]
    fn empty_vault_lists_empty() {
        let store = InMemoryVault::new();
        assert!(run(&store).unwrap().is_empty());
    }
}
