use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::DocFailure;
use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::model::Heading;
use crate::parser;
use crate::store::VaultStore;

const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub path: PathBuf,
    pub chain: Vec<String>,
    pub excerpt: String,
}

/// Search results plus the per-document parse failures that were skipped
/// over. Partial results are always returned.
#[derive(Debug, Default, Serialize)]
pub struct SearchReport {
    pub matches: Vec<SearchMatch>,
    pub failures: Vec<DocFailure>,
}

/// Case-insensitive substring search over heading titles, body text and ID
/// property values, across every document in the vault.
///
/// Documents are scanned in parallel; results keep vault-listing order, and
/// pre-order within a document. The whole operation fails only when not a
/// single document could be processed.
pub fn run<S: VaultStore + Sync>(
    store: &S,
    config: &VaultConfig,
    query: &str,
) -> Result<SearchReport> {
    let documents = store.list_documents()?;
    if query.is_empty() || documents.is_empty() {
        return Ok(SearchReport::default());
    }
    let needle = query.to_lowercase();

    let scanned: Vec<(PathBuf, Result<Vec<SearchMatch>>)> = documents
        .into_par_iter()
        .map(|path| {
            let outcome = scan_document(store, config, &path, &needle);
            (path, outcome)
        })
        .collect();

    let mut report = SearchReport::default();
    let mut processed = 0usize;
    let total = scanned.len();
    for (path, outcome) in scanned {
        match outcome {
            Ok(matches) => {
                processed += 1;
                report.matches.extend(matches);
            }
            Err(e) => {
                log::warn!("search skipping {}: {}", path.display(), e);
                report.failures.push(DocFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    if processed == 0 && total > 0 {
        let reasons = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.reason))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(OrgError::ScanFailed(reasons));
    }
    Ok(report)
}

fn scan_document<S: VaultStore>(
    store: &S,
    config: &VaultConfig,
    path: &Path,
    needle: &str,
) -> Result<Vec<SearchMatch>> {
    let text = store.read_document(path)?;
    let doc = parser::parse(path, &text, config)?;

    let mut matches = Vec::new();
    let mut chain = Vec::new();
    for heading in &doc.headings {
        scan_heading(heading, path, needle, &mut chain, &mut matches);
    }
    Ok(matches)
}

fn scan_heading(
    heading: &Heading,
    path: &Path,
    needle: &str,
    chain: &mut Vec<String>,
    matches: &mut Vec<SearchMatch>,
) {
    chain.push(heading.title.clone());

    let excerpt = if heading.title.to_lowercase().contains(needle) {
        Some(truncate(&heading.title))
    } else if let Some(line) = body_match(&heading.body, needle) {
        Some(line)
    } else {
        heading
            .id()
            .filter(|id| id.to_lowercase().contains(needle))
            .map(|id| format!(":ID: {}", id))
    };

    if let Some(excerpt) = excerpt {
        matches.push(SearchMatch {
            path: path.to_path_buf(),
            chain: chain.clone(),
            excerpt,
        });
    }

    for child in &heading.children {
        scan_heading(child, path, needle, chain, matches);
    }
    chain.pop();
}

/// First body line containing the needle, trimmed and truncated.
fn body_match(body: &str, needle: &str) -> Option<String> {
    body.lines()
        .find(|line| line.to_lowercase().contains(needle))
        .map(|line| truncate(line.trim()))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS - 1).collect();
        format!("{}…", cut)
    }
}
