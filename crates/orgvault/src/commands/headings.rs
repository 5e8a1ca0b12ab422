use std::path::Path;

use serde::Serialize;

use crate::config::VaultConfig;
use crate::error::Result;
use crate::index::{HeadingIndex, HeadingLocator};
use crate::model::{Property, Timestamp};
use crate::parser;
use crate::store::VaultStore;

/// One row of an outline listing.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineItem {
    pub level: usize,
    pub title: String,
    pub todo: Option<String>,
}

/// Everything a `read_heading` call reports about one heading. Children are
/// summarized as outline items, not fully expanded.
#[derive(Debug, Clone, Serialize)]
pub struct HeadingView {
    pub chain: Vec<String>,
    pub level: usize,
    pub title: String,
    pub todo: Option<String>,
    pub priority: Option<char>,
    pub tags: Vec<String>,
    pub scheduled: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub properties: Vec<Property>,
    pub body: String,
    pub children: Vec<OutlineItem>,
}

/// Pre-order listing of (level, title, todo) for one document.
pub fn outline<S: VaultStore>(
    store: &S,
    config: &VaultConfig,
    path: &Path,
) -> Result<Vec<OutlineItem>> {
    let text = store.read_document(path)?;
    let doc = parser::parse(path, &text, config)?;
    let index = HeadingIndex::build(&doc)?;
    Ok(index
        .entries()
        .iter()
        .map(|e| OutlineItem {
            level: e.level,
            title: e.title.clone(),
            todo: e.todo.clone(),
        })
        .collect())
}

/// Read one heading, located by title-chain or ID.
pub fn show<S: VaultStore>(
    store: &S,
    config: &VaultConfig,
    path: &Path,
    locator: &HeadingLocator,
) -> Result<HeadingView> {
    let text = store.read_document(path)?;
    let doc = parser::parse(path, &text, config)?;
    let index = HeadingIndex::build(&doc)?;
    let entry = index.locate(locator)?;
    let heading = doc
        .heading_at(&entry.addr)
        .expect("index addresses are valid for the document they were built from");

    Ok(HeadingView {
        chain: entry.chain.clone(),
        level: heading.level,
        title: heading.title.clone(),
        todo: heading.todo.clone(),
        priority: heading.priority,
        tags: heading.tags.clone(),
        scheduled: heading.scheduled.clone(),
        deadline: heading.deadline.clone(),
        properties: heading.properties.clone(),
        body: heading.body.clone(),
        children: heading
            .children
            .iter()
            .map(|c| OutlineItem {
                level: c.level,
                title: c.title.clone(),
                todo: c.todo.clone(),
            })
            .collect(),
    })
}
