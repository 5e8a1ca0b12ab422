//! # Heading Index
//!
//! A lazily-built, per-document addressing structure over a parsed
//! [`Document`]. It is purely derived data, rebuilt for every operation, and
//! exposes three views:
//!
//! - resolution by **title-chain** (exact, case-sensitive segment match from
//!   a top-level heading down to the target);
//! - resolution by **`:ID:`** property, with duplicate IDs reported at build
//!   time rather than silently picking one;
//! - a flat depth-first **pre-order listing** of all headings.
//!
//! Each entry carries a child-index address (`Vec<usize>`) into the owning
//! document, so callers can re-obtain `&Heading` or `&mut Heading` from the
//! tree without the index holding references or back-pointers.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{OrgError, Result};
use crate::model::{Document, Heading};

/// How an operation names the heading it targets.
#[derive(Debug, Clone)]
pub enum HeadingLocator {
    /// Ordered titles from a top-level heading down to the target.
    Chain(Vec<String>),
    /// Exact `:ID:` property value.
    Id(String),
}

impl HeadingLocator {
    pub fn chain<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self::Chain(segments.into_iter().map(Into::into).collect())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

/// One pre-order index entry.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    /// Child-index address into the document tree.
    pub addr: Vec<usize>,
    /// Ancestor titles, ending with this heading's own title.
    pub chain: Vec<String>,
    pub level: usize,
    pub title: String,
    pub todo: Option<String>,
    pub id: Option<String>,
}

/// Pre-order index of one document's headings.
#[derive(Debug)]
pub struct HeadingIndex {
    entries: Vec<IndexEntry>,
    by_id: HashMap<String, usize>,
}

impl HeadingIndex {
    /// Build the index. Fails with [`OrgError::DuplicateId`] when two
    /// headings share an `:ID:` value.
    pub fn build(doc: &Document) -> Result<Self> {
        let mut entries = Vec::new();
        let mut by_id = HashMap::new();

        fn visit(
            heading: &Heading,
            addr: &mut Vec<usize>,
            chain: &mut Vec<String>,
            entries: &mut Vec<IndexEntry>,
            by_id: &mut HashMap<String, usize>,
        ) -> Result<()> {
            chain.push(heading.title.clone());
            let id = heading.id().map(str::to_string);
            if let Some(id) = &id {
                if by_id.insert(id.clone(), entries.len()).is_some() {
                    return Err(OrgError::DuplicateId(id.clone()));
                }
            }
            entries.push(IndexEntry {
                addr: addr.clone(),
                chain: chain.clone(),
                level: heading.level,
                title: heading.title.clone(),
                todo: heading.todo.clone(),
                id,
            });
            for (i, child) in heading.children.iter().enumerate() {
                addr.push(i);
                visit(child, addr, chain, entries, by_id)?;
                addr.pop();
            }
            chain.pop();
            Ok(())
        }

        let mut addr = Vec::new();
        let mut chain = Vec::new();
        for (i, heading) in doc.headings.iter().enumerate() {
            addr.push(i);
            visit(heading, &mut addr, &mut chain, &mut entries, &mut by_id)?;
            addr.pop();
        }

        Ok(Self { entries, by_id })
    }

    /// Flat depth-first pre-order listing.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Resolve a full title-chain, reporting the first segment that fails to
    /// match anything.
    pub fn by_chain(&self, chain: &[String]) -> Result<&IndexEntry> {
        if chain.is_empty() {
            return Err(OrgError::InvalidInput(
                "empty title-chain locator".to_string(),
            ));
        }
        if let Some(entry) = self.entries.iter().find(|e| e.chain == chain) {
            return Ok(entry);
        }
        // Name the first segment with no matching prefix, for the error.
        let mut depth = 0;
        while depth < chain.len()
            && self
                .entries
                .iter()
                .any(|e| e.chain.len() == depth + 1 && e.chain[..] == chain[..=depth])
        {
            depth += 1;
        }
        let failing = chain.get(depth).unwrap_or_else(|| &chain[chain.len() - 1]);
        Err(OrgError::HeadingNotFound(failing.clone()))
    }

    /// Resolve an `:ID:` value.
    pub fn by_id(&self, id: &str) -> Result<&IndexEntry> {
        self.by_id
            .get(id)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| OrgError::IdNotFound(id.to_string()))
    }

    pub fn locate(&self, locator: &HeadingLocator) -> Result<&IndexEntry> {
        match locator {
            HeadingLocator::Chain(chain) => self.by_chain(chain),
            HeadingLocator::Id(id) => self.by_id(id),
        }
    }
}
