use std::path::PathBuf;

use console::style;
use orgvault::{AgendaReport, DocFailure, HeadingView, OutlineItem, SearchReport};

pub(super) fn success(message: &str) {
    println!("{}", style(message).green());
}

fn failures(failures: &[DocFailure]) {
    for failure in failures {
        eprintln!(
            "{}",
            style(format!(
                "skipped {}: {}",
                failure.path.display(),
                failure.reason
            ))
            .yellow()
        );
    }
}

pub(super) fn documents(docs: &[PathBuf]) {
    if docs.is_empty() {
        println!("No documents in the vault.");
        return;
    }
    for doc in docs {
        println!("{}", doc.display());
    }
}

pub(super) fn outline(items: &[OutlineItem]) {
    if items.is_empty() {
        println!("No headings.");
        return;
    }
    for item in items {
        let indent = "  ".repeat(item.level.saturating_sub(1));
        match &item.todo {
            Some(todo) => println!(
                "{}{} {}",
                indent,
                style(todo).yellow().bold(),
                item.title
            ),
            None => println!("{}{}", indent, item.title),
        }
    }
}

pub(super) fn heading(view: &HeadingView) {
    let mut title_line = String::new();
    if let Some(todo) = &view.todo {
        title_line.push_str(&format!("{} ", todo));
    }
    title_line.push_str(&view.title);
    println!("{}", style(title_line).bold());
    println!("{}", style(view.chain.join(" / ")).dim());

    if !view.tags.is_empty() {
        println!("tags: :{}:", view.tags.join(":"));
    }
    if let Some(ts) = &view.scheduled {
        println!("scheduled: {}", ts);
    }
    if let Some(ts) = &view.deadline {
        println!("deadline: {}", ts);
    }
    for property in &view.properties {
        println!(":{}: {}", property.key, property.value);
    }
    if !view.body.is_empty() {
        println!("--------------------------------");
        print!("{}", view.body);
        if !view.body.ends_with('\n') {
            println!();
        }
    }
    if !view.children.is_empty() {
        println!("--------------------------------");
        outline(&view.children);
    }
}

pub(super) fn search(report: &SearchReport) {
    if report.matches.is_empty() {
        println!("No matches.");
    }
    let mut last_path: Option<&PathBuf> = None;
    for m in &report.matches {
        if last_path != Some(&m.path) {
            println!("{}", style(m.path.display()).bold());
            last_path = Some(&m.path);
        }
        println!("  {}: {}", m.chain.join(" / "), style(&m.excerpt).dim());
    }
    failures(&report.failures);
}

pub(super) fn agenda(report: &AgendaReport) {
    if report.entries.is_empty() {
        println!("Agenda is empty.");
    }
    for entry in &report.entries {
        let mut dates = Vec::new();
        if let Some(date) = entry.scheduled {
            dates.push(format!("scheduled {}", date));
        }
        if let Some(date) = entry.deadline {
            dates.push(format!("deadline {}", date));
        }
        let state = entry
            .todo
            .as_deref()
            .map(|t| format!("{} ", t))
            .unwrap_or_default();
        println!(
            "{}{}  {} {}",
            style(state).yellow().bold(),
            entry.chain.join(" / "),
            style(dates.join(", ")).dim(),
            style(format!("({})", entry.path.display())).dim()
        );
    }
    failures(&report.failures);
}
