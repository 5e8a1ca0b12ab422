use std::path::Path;

use uuid::Uuid;

use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::index::{HeadingIndex, HeadingLocator};
use crate::model::{Document, Heading, NewHeading};
use crate::parser;
use crate::store::VaultStore;

/// Append a heading to a document: as the last child of the located parent
/// (level = parent level + 1), or as the last top-level heading when no
/// parent is given.
///
/// Returns the generated `:ID:` when one was requested.
pub fn run<S: VaultStore>(
    store: &mut S,
    config: &VaultConfig,
    path: &Path,
    parent: Option<&HeadingLocator>,
    new: NewHeading,
) -> Result<Option<String>> {
    let text = store.read_document(path)?;
    let mut doc = parser::parse(path, &text, config)?;

    let parent_addr = match parent {
        Some(locator) => {
            let index = HeadingIndex::build(&doc)?;
            Some(index.locate(locator)?.addr.clone())
        }
        None => None,
    };

    let id = append_to_document(&mut doc, parent_addr.as_deref(), new, config)?;
    store.write_document(path, &doc.render())?;
    Ok(id)
}

/// Shared with [`super::modify`] for its `AppendChild` change.
pub(crate) fn append_to_document(
    doc: &mut Document,
    parent_addr: Option<&[usize]>,
    new: NewHeading,
    config: &VaultConfig,
) -> Result<Option<String>> {
    if new.title.trim().is_empty() {
        return Err(OrgError::InvalidInput(
            "heading title must not be empty".to_string(),
        ));
    }
    if let Some(todo) = &new.todo {
        if !config.is_keyword(todo) {
            return Err(OrgError::InvalidInput(format!(
                "'{}' is not a recognized TODO keyword",
                todo
            )));
        }
    }

    let level = match parent_addr {
        Some(addr) => {
            doc.heading_at(addr)
                .expect("index addresses are valid for the document they were built from")
                .level
                + 1
        }
        None => 1,
    };

    let mut heading = Heading::new(level, new.title.trim());
    heading.todo = new.todo;
    heading.tags = new.tags;
    for (key, value) in new.properties {
        heading.set_property(&key, &value);
    }
    let generated = if new.assign_id {
        let id = Uuid::new_v4().to_string();
        heading.set_property("ID", &id);
        Some(id)
    } else {
        None
    };
    heading.body = new.body;
    if !heading.body.is_empty() && !heading.body.ends_with('\n') {
        heading.body.push('\n');
    }

    match parent_addr {
        Some(addr) => {
            let parent = doc
                .heading_at_mut(addr)
                .expect("address checked just above");
            parent.children.push(heading);
        }
        None => doc.headings.push(heading),
    }
    Ok(generated)
}
