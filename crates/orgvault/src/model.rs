//! # Domain Model: Outline Documents and Byte Fidelity
//!
//! This module defines the core data structures: [`Document`], [`Heading`],
//! [`Timestamp`], and the change descriptors applied by the mutation commands.
//!
//! ## The Problem
//!
//! Org files are personal data with whitespace- and order-sensitive syntax.
//! A heading spans several lines (title line, optional planning lines,
//! optional property drawer, body), and people keep comments, blank lines and
//! odd indentation everywhere. Rewriting a file from a normalized in-memory
//! form would destroy formatting the user never asked us to touch.
//!
//! ## Raw Segments
//!
//! Every heading therefore carries the *verbatim source bytes* of its
//! structural lines alongside the parsed view:
//!
//! ```text
//! ** TODO [#A] Title :tag:      <- raw title line (kept byte-for-byte)
//! SCHEDULED: <2025-01-01>       <- raw planning lines
//! :PROPERTIES:
//! :ID: 1234                     <- raw drawer lines
//! :END:
//! body text...                  <- body, always stored verbatim
//! ```
//!
//! Rendering emits the raw segment when it is present and rebuilds the lines
//! from the parsed fields only when a mutation invalidated that segment. An
//! unmodified tree renders back to the exact input bytes; a mutation changes
//! only the lines of the heading it touched.
//!
//! ## Tree Invariants
//!
//! - A child's level is strictly greater than its parent's.
//! - Sibling order is source order and is preserved on render.
//! - Parents exclusively own their children; "parent of" queries are answered
//!   by transient traversal (see [`crate::index`]), never stored pointers.

use chrono::{Days, Months, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One `:KEY: value` entry of a property drawer. Entry order is source order;
/// keys compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepeatUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A `+N`, `++N` or `.+N` repeater on a timestamp. The marks differ only in
/// how org shifts the date on task completion, which this system does not
/// perform, so agenda evaluation treats them alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repeater {
    pub mark: String,
    pub count: u32,
    pub unit: RepeatUnit,
}

impl fmt::Display for Repeater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            RepeatUnit::Day => 'd',
            RepeatUnit::Week => 'w',
            RepeatUnit::Month => 'm',
            RepeatUnit::Year => 'y',
        };
        write!(f, "{}{}{}", self.mark, self.count, unit)
    }
}

/// An active org timestamp: `<2025-01-01 Wed 10:00 +1w>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub repeater: Option<Repeater>,
}

impl Timestamp {
    pub fn date(date: NaiveDate) -> Self {
        Self {
            date,
            time: None,
            repeater: None,
        }
    }

    /// The next occurrence on or after `today`.
    ///
    /// Without a repeater this is the anchor date itself. With one, the anchor
    /// date if it has not passed, otherwise the first repeat on or after
    /// `today`. Occurrences before the anchor are never produced.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let Some(repeater) = &self.repeater else {
            return self.date;
        };
        if self.date >= today || repeater.count == 0 {
            return self.date;
        }
        match repeater.unit {
            RepeatUnit::Day | RepeatUnit::Week => {
                let step = i64::from(repeater.count)
                    * if repeater.unit == RepeatUnit::Week { 7 } else { 1 };
                let gap = (today - self.date).num_days();
                let steps = (gap + step - 1) / step;
                self.date
                    .checked_add_days(Days::new((steps * step) as u64))
                    .unwrap_or(self.date)
            }
            RepeatUnit::Month | RepeatUnit::Year => {
                let months = match repeater.unit {
                    RepeatUnit::Year => repeater.count * 12,
                    _ => repeater.count,
                };
                let mut date = self.date;
                while date < today {
                    match date.checked_add_months(Months::new(months)) {
                        Some(next) => date = next,
                        None => return date,
                    }
                }
                date
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.date.format("%Y-%m-%d %a"))?;
        if let Some(time) = self.time {
            write!(f, " {}", time.format("%H:%M"))?;
        }
        if let Some(repeater) = &self.repeater {
            write!(f, " {}", repeater)?;
        }
        write!(f, ">")
    }
}

/// Verbatim source lines of a heading's structural prefix. `None` means the
/// segment was mutated (or the heading is new) and must be rebuilt from the
/// parsed fields on render.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawSegments {
    pub title_line: Option<String>,
    pub planning: Option<String>,
    pub drawer: Option<String>,
}

/// One node of the outline tree: a titled section and everything nested
/// beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct Heading {
    /// Nesting depth; the number of leading stars. Always >= 1.
    pub level: usize,
    pub todo: Option<String>,
    pub priority: Option<char>,
    pub title: String,
    pub tags: Vec<String>,
    pub scheduled: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub properties: Vec<Property>,
    /// Body text, retained verbatim including blank lines and trailing
    /// whitespace. Does not include child headings.
    pub body: String,
    pub children: Vec<Heading>,
    #[serde(skip)]
    pub(crate) raw: RawSegments,
}

impl Heading {
    pub fn new(level: usize, title: impl Into<String>) -> Self {
        Self {
            level,
            todo: None,
            priority: None,
            title: title.into(),
            tags: Vec::new(),
            scheduled: None,
            deadline: None,
            properties: Vec::new(),
            body: String::new(),
            children: Vec::new(),
            raw: RawSegments::default(),
        }
    }

    /// Look up a property value, matching the key case-insensitively.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .map(|p| p.value.as_str())
    }

    /// The heading's `:ID:` property, if present.
    pub fn id(&self) -> Option<&str> {
        self.property("ID")
    }

    /// Set or replace the TODO keyword. Invalidates the raw title line.
    pub fn set_todo(&mut self, todo: Option<String>) {
        self.todo = todo;
        self.raw.title_line = None;
    }

    /// Set a property, replacing an existing entry with the same key
    /// (case-insensitive) or appending a new one. Invalidates the raw drawer.
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.raw.drawer = None;
        if let Some(existing) = self
            .properties
            .iter_mut()
            .find(|p| p.key.eq_ignore_ascii_case(key))
        {
            existing.value = value.to_string();
        } else {
            self.properties.push(Property {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Remove a property by key (case-insensitive). Returns whether an entry
    /// was removed. Invalidates the raw drawer only when something changed.
    pub fn remove_property(&mut self, key: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| !p.key.eq_ignore_ascii_case(key));
        if self.properties.len() != before {
            self.raw.drawer = None;
            true
        } else {
            false
        }
    }

    /// Replace the body text wholesale. The new text is stored as given.
    pub fn replace_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    fn render_into(&self, out: &mut String, eol: &str) {
        // A title line can only start at the beginning of a line. For raw
        // segments the original bytes guarantee this; for rebuilt or newly
        // inserted headings the preceding body may lack a final newline.
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }
        match &self.raw.title_line {
            Some(raw) => out.push_str(raw),
            None => {
                out.push_str(&"*".repeat(self.level));
                out.push(' ');
                if let Some(todo) = &self.todo {
                    out.push_str(todo);
                    out.push(' ');
                }
                if let Some(priority) = self.priority {
                    out.push_str(&format!("[#{}] ", priority));
                }
                out.push_str(&self.title);
                if !self.tags.is_empty() {
                    out.push_str(&format!(" :{}:", self.tags.join(":")));
                }
                out.push_str(eol);
            }
        }
        match &self.raw.planning {
            Some(raw) => out.push_str(raw),
            None => {
                let mut parts = Vec::new();
                if let Some(ts) = &self.scheduled {
                    parts.push(format!("SCHEDULED: {}", ts));
                }
                if let Some(ts) = &self.deadline {
                    parts.push(format!("DEADLINE: {}", ts));
                }
                if !parts.is_empty() {
                    out.push_str(&parts.join(" "));
                    out.push_str(eol);
                }
            }
        }
        match &self.raw.drawer {
            Some(raw) => out.push_str(raw),
            None => {
                if !self.properties.is_empty() {
                    out.push_str(":PROPERTIES:");
                    out.push_str(eol);
                    for property in &self.properties {
                        out.push_str(&format!(":{}: {}{}", property.key, property.value, eol));
                    }
                    out.push_str(":END:");
                    out.push_str(eol);
                }
            }
        }
        out.push_str(&self.body);
        for child in &self.children {
            child.render_into(out, eol);
        }
    }
}

/// A parsed outline document: unstructured preamble followed by the
/// top-level heading sequence. Constructed fresh for every operation; never
/// cached across calls.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path relative to the vault root.
    pub path: PathBuf,
    /// Lines before the first heading, verbatim.
    pub preamble: String,
    pub headings: Vec<Heading>,
    /// Dominant line terminator of the source, used when rebuilding the
    /// lines a mutation invalidated.
    #[serde(skip)]
    pub(crate) eol: &'static str,
}

impl Document {
    /// Serialize the tree back to bytes. For an unmodified tree this
    /// reproduces the parsed input exactly.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.preamble.len() + 256);
        out.push_str(&self.preamble);
        for heading in &self.headings {
            heading.render_into(&mut out, self.eol);
        }
        out
    }

    /// Walk a child-index address (as produced by [`crate::index`]) down to
    /// the heading it names.
    pub fn heading_at(&self, addr: &[usize]) -> Option<&Heading> {
        let (&first, rest) = addr.split_first()?;
        let mut current = self.headings.get(first)?;
        for &idx in rest {
            current = current.children.get(idx)?;
        }
        Some(current)
    }

    /// Mutable counterpart of [`Self::heading_at`].
    pub fn heading_at_mut(&mut self, addr: &[usize]) -> Option<&mut Heading> {
        let (&first, rest) = addr.split_first()?;
        let mut current = self.headings.get_mut(first)?;
        for &idx in rest {
            current = current.children.get_mut(idx)?;
        }
        Some(current)
    }
}

/// Fields for a heading to be appended by `add_heading`.
#[derive(Debug, Clone, Default)]
pub struct NewHeading {
    pub title: String,
    pub todo: Option<String>,
    pub tags: Vec<String>,
    pub body: String,
    pub properties: Vec<(String, String)>,
    /// Assign a freshly generated UUID `:ID:` property.
    pub assign_id: bool,
}

impl NewHeading {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_todo(mut self, todo: impl Into<String>) -> Self {
        self.todo = Some(todo.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// The single logical change a `modify_heading` call applies. Closed set so
/// the mutator's handling stays exhaustive.
#[derive(Debug, Clone)]
pub enum HeadingChange {
    ReplaceBody(String),
    /// `None` clears the TODO keyword.
    SetTodo(Option<String>),
    SetProperty {
        key: String,
        value: String,
    },
    RemoveProperty(String),
    AppendChild(NewHeading),
}
