//! # Outline Parser
//!
//! Turns raw document text into a [`Document`]: an unparsed preamble plus a
//! tree of [`Heading`] nodes. The scan is strictly line-oriented:
//!
//! - `^(\*+) ` starts a new heading at the star-count level.
//! - Planning lines (`SCHEDULED:` / `DEADLINE:`) are recognized only
//!   immediately after the title line, before drawer or body content.
//! - A `:PROPERTIES:` drawer directly after the planning lines is parsed
//!   into ordered entries; an unclosed drawer is a [`MalformedStructure`]
//!   error.
//! - Everything else accumulates verbatim into the current heading's body
//!   (or the preamble, before the first heading).
//!
//! Nesting is resolved with a stack keyed by level: a new heading attaches
//! to the nearest open heading with a strictly smaller level, or becomes
//! top-level if none exists. Lines are carried around *with* their
//! terminators (`split_inclusive`) so the parsed tree renders back to the
//! input bytes exactly.
//!
//! [`MalformedStructure`]: crate::error::OrgError::MalformedStructure

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::VaultConfig;
use crate::error::{OrgError, Result};
use crate::model::{Document, Heading, Property, RepeatUnit, Repeater, Timestamp};

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\*+) (.*)$").expect("heading regex"));

static PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[#([A-Za-z0-9])\]\s+").expect("priority regex"));

static TAGS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+:([A-Za-z0-9_@#%]+(?::[A-Za-z0-9_@#%]+)*):\s*$").expect("tags regex")
});

static PLANNING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(SCHEDULED|DEADLINE):\s*(<[^>\n]*>)").expect("planning regex"));

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<(\d{4})-(\d{2})-(\d{2})(?: [A-Za-z][A-Za-z.]{1,3})?(?: (\d{1,2}):(\d{2}))?(?: (\+\+|\.\+|\+)(\d+)([dwmy]))?\s*>$",
    )
    .expect("timestamp regex")
});

static PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([^:\s][^:]*):(?:\s+(.*))?$").expect("property regex"));

/// Strip the line terminator (`\n` or `\r\n`) from a raw line.
fn line_text(raw: &str) -> &str {
    let without_lf = raw.strip_suffix('\n').unwrap_or(raw);
    without_lf.strip_suffix('\r').unwrap_or(without_lf)
}

fn is_planning_line(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with("SCHEDULED:") || trimmed.starts_with("DEADLINE:")
}

/// Parse an active timestamp like `<2025-01-01 Wed 10:00 +1w>`.
/// Returns `None` when the bracketed text is not a well-formed date.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let caps = TIMESTAMP_RE.captures(text.trim())?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)
        }
        _ => None,
    };

    let repeater = match (caps.get(6), caps.get(7), caps.get(8)) {
        (Some(mark), Some(count), Some(unit)) => Some(Repeater {
            mark: mark.as_str().to_string(),
            count: count.as_str().parse().ok()?,
            unit: match unit.as_str() {
                "d" => RepeatUnit::Day,
                "w" => RepeatUnit::Week,
                "m" => RepeatUnit::Month,
                _ => RepeatUnit::Year,
            },
        }),
        _ => None,
    };

    Some(Timestamp {
        date,
        time,
        repeater,
    })
}

/// Parse document text into an outline tree.
///
/// `path` is the document's vault-relative path, recorded for error messages
/// and result identification. The configured TODO lexicon decides which
/// leading title words are keywords.
pub fn parse(path: impl Into<PathBuf>, text: &str, config: &VaultConfig) -> Result<Document> {
    let path = path.into();
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut preamble = String::new();
    let mut roots: Vec<Heading> = Vec::new();
    let mut stack: Vec<Heading> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let raw = lines[i];
        let text_line = line_text(raw);

        let Some(caps) = HEADING_RE.captures(text_line) else {
            match stack.last_mut() {
                Some(open) => open.body.push_str(raw),
                None => preamble.push_str(raw),
            }
            i += 1;
            continue;
        };

        let level = caps[1].len();
        close_down_to(&mut stack, &mut roots, level);

        let mut heading = parse_title_line(level, &caps[2], config);
        heading.raw.title_line = Some(raw.to_string());
        i += 1;

        // Planning zone: zero or more SCHEDULED/DEADLINE lines.
        let mut planning_raw = String::new();
        while i < lines.len() && is_planning_line(line_text(lines[i])) {
            for found in PLANNING_RE.captures_iter(line_text(lines[i])) {
                let parsed = parse_timestamp(&found[2]);
                if parsed.is_none() {
                    log::warn!(
                        "{}: unparsable timestamp '{}' kept verbatim",
                        path.display(),
                        &found[2]
                    );
                }
                match &found[1] {
                    "SCHEDULED" => heading.scheduled = parsed.or(heading.scheduled.take()),
                    _ => heading.deadline = parsed.or(heading.deadline.take()),
                }
            }
            planning_raw.push_str(lines[i]);
            i += 1;
        }
        if !planning_raw.is_empty() {
            heading.raw.planning = Some(planning_raw);
        }

        // Property drawer, directly after the planning zone.
        if i < lines.len()
            && line_text(lines[i])
                .trim()
                .eq_ignore_ascii_case(":PROPERTIES:")
        {
            i = parse_drawer(&path, &lines, i, &mut heading)?;
        }

        stack.push(heading);
    }

    close_all(&mut stack, &mut roots);

    Ok(Document {
        path,
        preamble,
        headings: roots,
        eol: if text.contains("\r\n") { "\r\n" } else { "\n" },
    })
}

/// Parse text that is not (yet) tied to a vault path. Mostly useful in tests
/// and for callers that already hold the bytes.
pub fn parse_str(text: &str, config: &VaultConfig) -> Result<Document> {
    parse(PathBuf::new(), text, config)
}

fn parse_title_line(level: usize, rest: &str, config: &VaultConfig) -> Heading {
    let mut heading = Heading::new(level, "");
    let mut remainder = rest.trim_start();

    if let Some(first) = remainder.split_whitespace().next() {
        if config.is_keyword(first) {
            heading.todo = Some(first.to_string());
            remainder = remainder[first.len()..].trim_start();
        }
    }

    if let Some(caps) = PRIORITY_RE.captures(remainder) {
        heading.priority = caps[1].chars().next();
        remainder = &remainder[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
    }

    if let Some(caps) = TAGS_RE.captures(remainder) {
        heading.tags = caps[1].split(':').map(str::to_string).collect();
        remainder = &remainder[..caps.get(0).map(|m| m.start()).unwrap_or(remainder.len())];
    }

    heading.title = remainder.trim().to_string();
    heading
}

/// Parse a `:PROPERTIES:` drawer starting at `lines[start]`. Returns the index
/// of the first line after `:END:`, or fails if the drawer never closes
/// before the next heading or EOF.
fn parse_drawer(
    path: &Path,
    lines: &[&str],
    start: usize,
    heading: &mut Heading,
) -> Result<usize> {
    let mut drawer_raw = String::from(lines[start]);
    let mut i = start + 1;

    while i < lines.len() {
        let text_line = line_text(lines[i]);
        if HEADING_RE.is_match(text_line) {
            break;
        }
        drawer_raw.push_str(lines[i]);
        i += 1;
        let trimmed = text_line.trim();
        if trimmed.eq_ignore_ascii_case(":END:") {
            heading.raw.drawer = Some(drawer_raw);
            return Ok(i);
        }
        if let Some(caps) = PROPERTY_RE.captures(trimmed) {
            heading.properties.push(Property {
                key: caps[1].trim().to_string(),
                value: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
            });
        }
    }

    Err(OrgError::MalformedStructure {
        path: path.to_path_buf(),
        line: start + 1,
        reason: "property drawer is never closed".to_string(),
    })
}

/// Pop-and-attach every open heading whose level is >= the incoming one, so
/// the new heading lands under the nearest strictly-smaller ancestor.
fn close_down_to(stack: &mut Vec<Heading>, roots: &mut Vec<Heading>, level: usize) {
    while stack.last().is_some_and(|h| h.level >= level) {
        let closed = stack.pop().expect("checked non-empty");
        match stack.last_mut() {
            Some(parent) => parent.children.push(closed),
            None => roots.push(closed),
        }
    }
}

fn close_all(stack: &mut Vec<Heading>, roots: &mut Vec<Heading>) {
    close_down_to(stack, roots, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VaultConfig {
        VaultConfig::default()
    }

    fn roundtrip(text: &str) {
        let doc = parse_str(text, &config()).unwrap();
        assert_eq!(doc.render(), text, "parse+render must reproduce input");
    }

    #[test]
    fn roundtrip_is_byte_exact() {
        roundtrip("");
        roundtrip("just a preamble, no headings\n");
        roundtrip("* One\n");
        roundtrip("* One");
        roundtrip("preamble\n\n* A\nbody  \n\n** A1\n:PROPERTIES:\n:ID: x\n:END:\ntext\n* B\n");
        roundtrip("* T\r\nbody\r\n** C\r\n");
        roundtrip("* A\nSCHEDULED: <2025-01-01 Wed>\n\nbody with trailing blank\n\n");
        roundtrip("* A\n*not a heading\n *also not\n");
        roundtrip("* TODO [#A] Task :tag1:tag2:\nDEADLINE: <2025-02-03>\n");
    }

    #[test]
    fn preamble_precedes_first_heading() {
        let doc = parse_str("#+TITLE: My vault\n\n* First\n", &config()).unwrap();
        assert_eq!(doc.preamble, "#+TITLE: My vault\n\n");
        assert_eq!(doc.headings.len(), 1);
        assert_eq!(doc.headings[0].title, "First");
    }

    #[test]
    fn nesting_follows_levels() {
        let doc = parse_str("* A\n** A1\n*** A1a\n** A2\n* B\n", &config()).unwrap();
        assert_eq!(doc.headings.len(), 2);
        let a = &doc.headings[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].children[0].title, "A1a");
        assert_eq!(a.children[1].title, "A2");
    }

    #[test]
    fn child_levels_strictly_greater() {
        let text = "* A\n*** skips a level\n** back\n* B\n** under b\n";
        let doc = parse_str(text, &config()).unwrap();

        fn check(h: &crate::model::Heading) {
            for child in &h.children {
                assert!(child.level > h.level);
                check(child);
            }
        }
        for h in &doc.headings {
            check(h);
        }
        // The level-3 heading still attaches under A, the nearest smaller level
        assert_eq!(doc.headings[0].children[0].title, "skips a level");
    }

    #[test]
    fn title_line_parsing() {
        let doc = parse_str("** TODO [#B] Fix the roof :house:urgent:\n", &config()).unwrap();
        let h = &doc.headings[0];
        assert_eq!(h.level, 2);
        assert_eq!(h.todo.as_deref(), Some("TODO"));
        assert_eq!(h.priority, Some('B'));
        assert_eq!(h.title, "Fix the roof");
        assert_eq!(h.tags, vec!["house", "urgent"]);
    }

    #[test]
    fn unknown_keyword_stays_in_title() {
        let doc = parse_str("* MAYBE Buy a boat\n", &config()).unwrap();
        assert_eq!(doc.headings[0].todo, None);
        assert_eq!(doc.headings[0].title, "MAYBE Buy a boat");
    }

    #[test]
    fn custom_keywords_recognized() {
        let custom = VaultConfig {
            todo_keywords: Some(vec!["NEXT".to_string()]),
            ..Default::default()
        };
        let doc = parse_str("* NEXT Call the bank\n", &custom).unwrap();
        assert_eq!(doc.headings[0].todo.as_deref(), Some("NEXT"));
        assert_eq!(doc.headings[0].title, "Call the bank");
    }

    #[test]
    fn planning_lines_attach_to_heading() {
        let text = "* TODO Pay rent\nSCHEDULED: <2025-01-01 Wed> DEADLINE: <2025-01-05 Sun>\nbody\n";
        let doc = parse_str(text, &config()).unwrap();
        let h = &doc.headings[0];
        assert_eq!(
            h.scheduled.as_ref().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(
            h.deadline.as_ref().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
        assert_eq!(h.body, "body\n");
    }

    #[test]
    fn scheduled_in_body_is_not_planning() {
        let text = "* A\nsome text\nSCHEDULED: <2025-01-01>\n";
        let doc = parse_str(text, &config()).unwrap();
        assert!(doc.headings[0].scheduled.is_none());
        assert!(doc.headings[0].body.contains("SCHEDULED"));
    }

    #[test]
    fn drawer_entries_parsed_in_order() {
        let text = "* A\n:PROPERTIES:\n:ID: abc-123\n:Category: work\n:END:\nbody\n";
        let doc = parse_str(text, &config()).unwrap();
        let h = &doc.headings[0];
        assert_eq!(h.properties.len(), 2);
        assert_eq!(h.id(), Some("abc-123"));
        assert_eq!(h.property("CATEGORY"), Some("work"));
        assert_eq!(h.body, "body\n");
    }

    #[test]
    fn drawer_delimiters_case_insensitive() {
        let text = "* A\n:properties:\n:id: x\n:end:\n";
        let doc = parse_str(text, &config()).unwrap();
        assert_eq!(doc.headings[0].id(), Some("x"));
    }

    #[test]
    fn unclosed_drawer_is_malformed() {
        let err = parse_str("* A\n:PROPERTIES:\n:ID: x\n* B\n", &config()).unwrap_err();
        assert!(matches!(err, OrgError::MalformedStructure { line: 2, .. }));

        let err = parse_str("* A\n:PROPERTIES:\n:ID: x\n", &config()).unwrap_err();
        assert!(matches!(err, OrgError::MalformedStructure { .. }));
    }

    #[test]
    fn timestamp_forms() {
        let ts = parse_timestamp("<2025-01-01>").unwrap();
        assert!(ts.time.is_none() && ts.repeater.is_none());

        let ts = parse_timestamp("<2025-01-01 Wed 09:30>").unwrap();
        assert_eq!(ts.time, NaiveTime::from_hms_opt(9, 30, 0));

        let ts = parse_timestamp("<2025-01-01 Wed 09:30 .+2w>").unwrap();
        let rep = ts.repeater.unwrap();
        assert_eq!(rep.mark, ".+");
        assert_eq!(rep.count, 2);
        assert_eq!(rep.unit, RepeatUnit::Week);

        assert!(parse_timestamp("<not a date>").is_none());
        assert!(parse_timestamp("<2025-13-40>").is_none());
    }
}
