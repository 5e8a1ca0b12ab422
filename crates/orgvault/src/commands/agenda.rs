use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use super::DocFailure;
use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::model::Heading;
use crate::parser;
use crate::store::VaultStore;

/// Which slice of the agenda to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaView {
    /// Everything: TODO-carrying, scheduled and deadlined headings.
    Full,
    /// Only headings with an open (non-done) TODO keyword.
    Todos,
    /// Only headings with a scheduled or deadline timestamp.
    Schedule,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgendaEntry {
    pub path: PathBuf,
    pub chain: Vec<String>,
    pub todo: Option<String>,
    /// Repeater-evaluated next occurrence of the scheduled timestamp.
    pub scheduled: Option<NaiveDate>,
    /// Repeater-evaluated next occurrence of the deadline.
    pub deadline: Option<NaiveDate>,
}

impl AgendaEntry {
    /// The date this entry sorts by: the earlier of its evaluated dates.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        match (self.scheduled, self.deadline) {
            (Some(s), Some(d)) => Some(s.min(d)),
            (s, d) => s.or(d),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AgendaReport {
    pub entries: Vec<AgendaEntry>,
    pub failures: Vec<DocFailure>,
}

/// Walk every vault document and collect agenda entries.
///
/// Sorting: entries due on or before `today` come first (by date, then vault
/// order), followed by undated TODO items (vault order), then future-dated
/// entries (by date, then vault order). Documents that fail to parse
/// contribute zero entries and a failure note; the operation errors only when
/// no document at all could be processed.
pub fn run<S: VaultStore + Sync>(
    store: &S,
    config: &VaultConfig,
    view: AgendaView,
    today: NaiveDate,
) -> Result<AgendaReport> {
    let documents = store.list_documents()?;
    let total = documents.len();

    let scanned: Vec<(PathBuf, Result<Vec<AgendaEntry>>)> = documents
        .into_par_iter()
        .map(|path| {
            let outcome = scan_document(store, config, &path, view, today);
            (path, outcome)
        })
        .collect();

    let mut failures = Vec::new();
    let mut keyed: Vec<((u8, NaiveDate, usize, usize), AgendaEntry)> = Vec::new();
    let mut processed = 0usize;
    for (doc_index, (path, outcome)) in scanned.into_iter().enumerate() {
        match outcome {
            Ok(entries) => {
                processed += 1;
                for entry in entries {
                    let key = sort_key(&entry, today, doc_index, keyed.len());
                    keyed.push((key, entry));
                }
            }
            Err(e) => {
                log::warn!("agenda skipping {}: {}", path.display(), e);
                failures.push(DocFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    if processed == 0 && total > 0 {
        let reasons = failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.reason))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(OrgError::ScanFailed(reasons));
    }

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(AgendaReport {
        entries: keyed.into_iter().map(|(_, entry)| entry).collect(),
        failures,
    })
}

/// Due-or-overdue first, then undated, then future.
fn sort_key(
    entry: &AgendaEntry,
    today: NaiveDate,
    doc_index: usize,
    preorder: usize,
) -> (u8, NaiveDate, usize, usize) {
    match entry.effective_date() {
        Some(date) if date <= today => (0, date, doc_index, preorder),
        None => (1, today, doc_index, preorder),
        Some(date) => (2, date, doc_index, preorder),
    }
}

fn scan_document<S: VaultStore>(
    store: &S,
    config: &VaultConfig,
    path: &Path,
    view: AgendaView,
    today: NaiveDate,
) -> Result<Vec<AgendaEntry>> {
    let text = store.read_document(path)?;
    let doc = parser::parse(path, &text, config)?;

    let mut entries = Vec::new();
    let mut chain = Vec::new();
    for heading in &doc.headings {
        collect(heading, path, config, view, today, &mut chain, &mut entries);
    }
    Ok(entries)
}

fn collect(
    heading: &Heading,
    path: &Path,
    config: &VaultConfig,
    view: AgendaView,
    today: NaiveDate,
    chain: &mut Vec<String>,
    entries: &mut Vec<AgendaEntry>,
) {
    chain.push(heading.title.clone());

    let has_date = heading.scheduled.is_some() || heading.deadline.is_some();
    let is_open_todo = heading
        .todo
        .as_deref()
        .is_some_and(|kw| !config.is_done_keyword(kw));
    let wanted = match view {
        AgendaView::Full => heading.todo.is_some() || has_date,
        AgendaView::Todos => is_open_todo,
        AgendaView::Schedule => has_date,
    };

    if wanted {
        entries.push(AgendaEntry {
            path: path.to_path_buf(),
            chain: chain.clone(),
            todo: heading.todo.clone(),
            scheduled: heading.scheduled.as_ref().map(|t| t.next_occurrence(today)),
            deadline: heading.deadline.as_ref().map(|t| t.next_occurrence(today)),
        });
    }

    for child in &heading.children {
        collect(child, path, config, view, today, chain, entries);
    }
    chain.pop();
}
