//! # Orgvault Architecture
//!
//! Orgvault is a **UI-agnostic outline vault library**: it exposes a personal
//! directory of org-mode plain-text documents through a small set of
//! read/search/write operations, preserving byte-level fidelity of everything
//! a write does not touch.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (e.g. the orgv CLI crate)                           │
//! │  - Argument parsing, rendering, terminal I/O                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, one method per operation                    │
//! │  - Holds the vault store + config context                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure logic: parse, index, mutate, render                 │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract VaultStore trait                                │
//! │  - FileVault (production), InMemoryVault (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Parse Fresh, Write Whole
//!
//! Every operation parses its target document from the store at the moment it
//! runs; nothing is cached between operations, so there is no staleness to
//! manage. Writes locate one heading, apply exactly one logical change, and
//! re-render the whole tree — with every untouched heading reproduced
//! byte-for-byte thanks to the raw segments kept by the parser (see
//! [`model`]).
//!
//! Operations on different documents are safe to run concurrently. Two
//! mutations of the *same* document race: the read-modify-write sequence is
//! not atomic across processes and last-writer-wins is the accepted outcome.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade — entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`parser`]: Outline text → heading tree
//! - [`model`]: Core data types (`Document`, `Heading`, `Timestamp`)
//! - [`index`]: Per-document addressing (title-chains, `:ID:` lookup)
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Vault configuration (file extension, TODO lexicon)
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod store;

pub use api::OrgApi;
pub use commands::agenda::{AgendaEntry, AgendaReport, AgendaView};
pub use commands::headings::{HeadingView, OutlineItem};
pub use commands::search::{SearchMatch, SearchReport};
pub use commands::DocFailure;
pub use config::{default_vault_root, VaultConfig};
pub use error::{OrgError, Result};
pub use index::{HeadingIndex, HeadingLocator};
pub use model::{Document, Heading, HeadingChange, NewHeading, Property, Timestamp};
