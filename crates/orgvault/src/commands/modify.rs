use std::path::Path;

use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::index::{HeadingIndex, HeadingLocator};
use crate::model::HeadingChange;
use crate::parser;
use crate::store::VaultStore;

/// Apply exactly one logical change to one heading and persist the document.
/// Returns the generated `:ID:` when the change appended a child that
/// requested one, as `add_heading` does for its own appends.
///
/// The on-disk bytes are re-read here, immediately before the write; no tree
/// ever spans two operations. Concurrent mutations of the same document are
/// not protected against beyond that — the read-modify-write sequence is not
/// atomic across processes, and a race can lose an update.
///
/// Every heading other than the target (and the preamble) is re-rendered
/// byte-for-byte; only the changed heading's lines differ.
pub fn run<S: VaultStore>(
    store: &mut S,
    config: &VaultConfig,
    path: &Path,
    locator: &HeadingLocator,
    change: HeadingChange,
) -> Result<Option<String>> {
    let text = store.read_document(path)?;
    let mut doc = parser::parse(path, &text, config)?;
    let addr = {
        let index = HeadingIndex::build(&doc)?;
        index.locate(locator)?.addr.clone()
    };

    let generated = match change {
        HeadingChange::AppendChild(new) => {
            super::add_heading::append_to_document(&mut doc, Some(&addr), new, config)?
        }
        change => {
            let heading = doc
                .heading_at_mut(&addr)
                .expect("index addresses are valid for the document they were built from");
            match change {
                HeadingChange::ReplaceBody(body) => heading.replace_body(body),
                HeadingChange::SetTodo(todo) => {
                    if let Some(keyword) = &todo {
                        if !config.is_keyword(keyword) {
                            return Err(OrgError::InvalidInput(format!(
                                "'{}' is not a recognized TODO keyword",
                                keyword
                            )));
                        }
                    }
                    heading.set_todo(todo);
                }
                HeadingChange::SetProperty { key, value } => {
                    if key.trim().is_empty() || key.contains(':') {
                        return Err(OrgError::InvalidInput(format!(
                            "invalid property key '{}'",
                            key
                        )));
                    }
                    heading.set_property(key.trim(), &value);
                }
                HeadingChange::RemoveProperty(key) => {
                    if !heading.remove_property(&key) {
                        return Err(OrgError::InvalidInput(format!(
                            "no property '{}' on this heading",
                            key
                        )));
                    }
                }
                HeadingChange::AppendChild(_) => unreachable!("handled above"),
            }
            None
        }
    };

    store.write_document(path, &doc.render())?;
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewHeading;
    use crate::store::memory::InMemoryVault;

    const DOC: &str = "\
#+TITLE: vault

* Untouched first   \nweird  trailing  spaces
* Target
SCHEDULED: <2025-01-01 Wed>
:PROPERTIES:
:ID: t-1
:END:
old body
** Child
* Untouched last
tail
";

    fn config() -> VaultConfig {
        VaultConfig::default()
    }

    fn store() -> InMemoryVault {
        InMemoryVault::new().with_document("a.org", DOC)
    }

    fn locator() -> HeadingLocator {
        HeadingLocator::chain(["Target"])
    }

    #[test]
    fn replace_body_leaves_siblings_byte_identical() {
        let mut store = store();
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::ReplaceBody("new body\n".to_string()),
        )
        .unwrap();
        let after = store.contents("a.org").unwrap();
        assert!(after.contains("new body\n"));
        assert!(!after.contains("old body"));
        // Everything around the target survives byte-for-byte
        assert!(after.starts_with("#+TITLE: vault\n\n* Untouched first   \nweird  trailing  spaces\n"));
        assert!(after.ends_with("* Untouched last\ntail\n"));
        // Raw title, planning and drawer lines of the target survive too
        assert!(after.contains("* Target\nSCHEDULED: <2025-01-01 Wed>\n:PROPERTIES:\n:ID: t-1\n:END:\nnew body\n** Child\n"));
    }

    #[test]
    fn set_todo_rewrites_only_title_line() {
        let mut store = store();
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &HeadingLocator::id("t-1"),
            HeadingChange::SetTodo(Some("TODO".to_string())),
        )
        .unwrap();
        let after = store.contents("a.org").unwrap();
        assert!(after.contains("* TODO Target\nSCHEDULED: <2025-01-01 Wed>\n"));
        assert!(after.contains("old body"));
    }

    #[test]
    fn clear_todo() {
        let mut store = InMemoryVault::new().with_document("a.org", "* DONE Finished\n");
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &HeadingLocator::chain(["Finished"]),
            HeadingChange::SetTodo(None),
        )
        .unwrap();
        assert_eq!(store.contents("a.org"), Some("* Finished\n"));
    }

    #[test]
    fn set_todo_rejects_unknown_keyword() {
        let mut store = store();
        let err = run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::SetTodo(Some("SOMEDAY".to_string())),
        )
        .unwrap_err();
        assert!(matches!(err, OrgError::InvalidInput(_)));
        assert_eq!(store.contents("a.org"), Some(DOC));
    }

    #[test]
    fn set_property_updates_drawer_in_place() {
        let mut store = store();
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::SetProperty {
                key: "Category".to_string(),
                value: "home".to_string(),
            },
        )
        .unwrap();
        let after = store.contents("a.org").unwrap();
        assert!(after.contains(":PROPERTIES:\n:ID: t-1\n:Category: home\n:END:\n"));
    }

    #[test]
    fn remove_property() {
        let mut store = store();
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::RemoveProperty("id".to_string()),
        )
        .unwrap();
        let after = store.contents("a.org").unwrap();
        assert!(!after.contains(":ID:"));
        // Empty drawer is dropped entirely rather than left as a husk
        assert!(!after.contains(":PROPERTIES:"));
    }

    #[test]
    fn remove_missing_property_errors_and_preserves_file() {
        let mut store = store();
        let err = run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::RemoveProperty("nope".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, OrgError::InvalidInput(_)));
        assert_eq!(store.contents("a.org"), Some(DOC));
    }

    #[test]
    fn append_child_through_change_descriptor() {
        let mut store = store();
        let id = run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::AppendChild(NewHeading::titled("New child")),
        )
        .unwrap();
        assert!(id.is_none());
        let after = store.contents("a.org").unwrap();
        assert!(after.contains("** Child\n** New child\n* Untouched last\n"));
    }

    #[test]
    fn append_child_reports_generated_id() {
        let mut store = store();
        let new = NewHeading {
            assign_id: true,
            ..NewHeading::titled("With id")
        };
        let id = run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &locator(),
            HeadingChange::AppendChild(new),
        )
        .unwrap()
        .unwrap();
        let after = store.contents("a.org").unwrap();
        assert!(after.contains(&format!(":ID: {}\n", id)));
    }

    #[test]
    fn crlf_document_keeps_crlf_on_rebuilt_lines() {
        let mut store =
            InMemoryVault::new().with_document("a.org", "* Target\r\nbody\r\n* Other\r\n");
        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &HeadingLocator::chain(["Target"]),
            HeadingChange::SetTodo(Some("TODO".to_string())),
        )
        .unwrap();
        assert_eq!(
            store.contents("a.org"),
            Some("* TODO Target\r\nbody\r\n* Other\r\n")
        );

        run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &HeadingLocator::chain(["Target"]),
            HeadingChange::SetProperty {
                key: "ID".to_string(),
                value: "x".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            store.contents("a.org"),
            Some("* TODO Target\r\n:PROPERTIES:\r\n:ID: x\r\n:END:\r\nbody\r\n* Other\r\n")
        );
    }

    #[test]
    fn unresolvable_locator_leaves_document_untouched() {
        let mut store = store();
        let err = run(
            &mut store,
            &config(),
            Path::new("a.org"),
            &HeadingLocator::chain(["Target".to_string(), "Missing".to_string()]),
            HeadingChange::ReplaceBody(String::new()),
        )
        .unwrap_err();
        assert!(matches!(err, OrgError::HeadingNotFound(_)));
        assert_eq!(store.contents("a.org"), Some(DOC));
    }
}
