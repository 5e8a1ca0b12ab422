use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use orgvault::HeadingLocator;

#[derive(Parser, Debug)]
#[command(name = "orgv")]
#[command(about = "Your org-mode outline vault from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root (defaults to $ORG_DIR, then ~/org)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Emit machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,
}

/// Names a heading inside a document: a `/`-separated title-chain or an
/// `:ID:` value.
#[derive(Args, Debug, Default)]
pub struct LocatorArgs {
    /// Title-chain from the top level, segments separated by '/'
    /// (e.g. "Projects/Write report")
    #[arg(long, value_name = "CHAIN", conflicts_with = "id")]
    pub at: Option<String>,

    /// The heading's :ID: property value
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,
}

impl LocatorArgs {
    pub fn to_locator(&self) -> Option<HeadingLocator> {
        if let Some(id) = &self.id {
            return Some(HeadingLocator::id(id));
        }
        self.at
            .as_ref()
            .map(|chain| HeadingLocator::chain(chain.split('/')))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the documents in the vault
    #[command(alias = "ls")]
    List,

    /// List a document's headings in outline order
    Headings {
        /// Vault-relative document path
        file: PathBuf,
    },

    /// Show one heading: metadata, body and child summary
    Show {
        file: PathBuf,
        #[command(flatten)]
        locator: LocatorArgs,
    },

    /// Print a document's full text
    Cat {
        file: PathBuf,
    },

    /// Search titles, bodies and IDs across the whole vault
    Search {
        query: String,
    },

    /// Create a new document
    New {
        file: PathBuf,
        /// Initial content (empty by default)
        #[arg(default_value = "")]
        content: String,
    },

    /// Append a heading to a document
    Add {
        file: PathBuf,
        title: String,
        /// Parent heading; omitted means append at the top level
        #[command(flatten)]
        parent: LocatorArgs,
        /// TODO keyword for the new heading
        #[arg(long)]
        todo: Option<String>,
        /// Body text under the new heading
        #[arg(long, default_value = "")]
        body: String,
        /// Tags for the new heading (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Assign a generated UUID :ID: property
        #[arg(long)]
        assign_id: bool,
    },

    /// Show the vault-wide agenda
    Agenda {
        /// Only open TODO items
        #[arg(long, conflicts_with = "schedule")]
        todos: bool,
        /// Only scheduled/deadline items
        #[arg(long)]
        schedule: bool,
    },

    /// Set or clear a heading's TODO state
    Todo {
        file: PathBuf,
        #[command(flatten)]
        locator: LocatorArgs,
        /// New state (e.g. TODO, DONE)
        #[arg(required_unless_present = "clear")]
        state: Option<String>,
        /// Clear the state instead of setting one
        #[arg(long, conflicts_with = "state")]
        clear: bool,
    },

    /// Set or remove a property on a heading
    Prop {
        file: PathBuf,
        key: String,
        #[arg(required_unless_present = "remove")]
        value: Option<String>,
        #[command(flatten)]
        locator: LocatorArgs,
        /// Remove the property instead of setting it
        #[arg(long, conflicts_with = "value")]
        remove: bool,
    },

    /// Replace a heading's body text
    Body {
        file: PathBuf,
        text: String,
        #[command(flatten)]
        locator: LocatorArgs,
    },
}
