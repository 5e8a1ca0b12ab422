//! # API Facade
//!
//! The single entry point for all vault operations, regardless of the UI in
//! front of it. One method per exposed operation, each a thin dispatch into
//! the matching command module.
//!
//! The facade holds the two pieces of explicit context every operation
//! needs — the [`VaultStore`] and the [`VaultConfig`] — so multiple vaults
//! can coexist in one process (and in tests) without hidden global state.
//!
//! ## What the Facade Does NOT Do
//!
//! - **Business logic**: that lives in `commands/*.rs`.
//! - **I/O concerns**: no stdout, stderr, or terminal assumptions.
//! - **Presentation**: methods return data structures, never strings meant
//!   for display.
//!
//! Generic over the storage backend: production uses
//! [`FileVault`](crate::store::fs::FileVault), tests use
//! [`InMemoryVault`](crate::store::memory::InMemoryVault).

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::commands::{self, agenda::AgendaReport, agenda::AgendaView};
use crate::commands::headings::{HeadingView, OutlineItem};
use crate::commands::search::SearchReport;
use crate::config::VaultConfig;
use crate::error::Result;
use crate::index::HeadingLocator;
use crate::model::{HeadingChange, NewHeading};
use crate::store::VaultStore;

/// The main API facade for vault operations.
pub struct OrgApi<S: VaultStore> {
    store: S,
    config: VaultConfig,
}

impl<S: VaultStore> OrgApi<S> {
    pub fn new(store: S, config: VaultConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn list_documents(&self) -> Result<Vec<PathBuf>> {
        commands::list::run(&self.store)
    }

    pub fn read_headings(&self, path: &Path) -> Result<Vec<OutlineItem>> {
        commands::headings::outline(&self.store, &self.config, path)
    }

    pub fn read_heading(&self, path: &Path, locator: &HeadingLocator) -> Result<HeadingView> {
        commands::headings::show(&self.store, &self.config, path, locator)
    }

    pub fn read_document(&self, path: &Path) -> Result<String> {
        commands::read::run(&self.store, path)
    }

    pub fn search(&self, query: &str) -> Result<SearchReport>
    where
        S: Sync,
    {
        commands::search::run(&self.store, &self.config, query)
    }

    pub fn add_document(&mut self, path: &Path, content: &str) -> Result<()> {
        commands::create::run(&mut self.store, &self.config, path, content)
    }

    pub fn add_heading(
        &mut self,
        path: &Path,
        parent: Option<&HeadingLocator>,
        new: NewHeading,
    ) -> Result<Option<String>> {
        commands::add_heading::run(&mut self.store, &self.config, path, parent, new)
    }

    pub fn read_agenda(&self, view: AgendaView) -> Result<AgendaReport>
    where
        S: Sync,
    {
        commands::agenda::run(
            &self.store,
            &self.config,
            view,
            Local::now().date_naive(),
        )
    }

    /// Returns the generated `:ID:` when the change appended a child that
    /// requested one.
    pub fn modify_heading(
        &mut self,
        path: &Path,
        locator: &HeadingLocator,
        change: HeadingChange,
    ) -> Result<Option<String>> {
        commands::modify::run(&mut self.store, &self.config, path, locator, change)
    }
}
