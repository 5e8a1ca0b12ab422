use anyhow::{bail, Result};
use orgvault::store::fs::FileVault;
use orgvault::{AgendaView, HeadingChange, NewHeading, OrgApi};
use serde_json::json;

use super::print;
use super::setup::{Cli, Commands, LocatorArgs};

fn require_locator(args: &LocatorArgs) -> Result<orgvault::HeadingLocator> {
    args.to_locator()
        .ok_or_else(|| anyhow::anyhow!("a heading locator is required: pass --at or --id"))
}

pub fn dispatch(mut api: OrgApi<FileVault>, cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::List => {
            let docs = api.list_documents()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&docs)?);
            } else {
                print::documents(&docs);
            }
        }
        Commands::Headings { file } => {
            let outline = api.read_headings(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outline)?);
            } else {
                print::outline(&outline);
            }
        }
        Commands::Show { file, locator } => {
            let view = api.read_heading(&file, &require_locator(&locator)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print::heading(&view);
            }
        }
        Commands::Cat { file } => {
            let content = api.read_document(&file)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "path": file, "content": content }))?
                );
            } else {
                print!("{}", content);
            }
        }
        Commands::Search { query } => {
            let report = api.search(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print::search(&report);
            }
        }
        Commands::New { file, content } => {
            api.add_document(&file, &content)?;
            if json {
                println!("{}", json!({ "created": file }));
            } else {
                print::success(&format!("Created {}", file.display()));
            }
        }
        Commands::Add {
            file,
            title,
            parent,
            todo,
            body,
            tags,
            assign_id,
        } => {
            let new = NewHeading {
                title,
                todo,
                tags,
                body,
                properties: Vec::new(),
                assign_id,
            };
            let id = api.add_heading(&file, parent.to_locator().as_ref(), new)?;
            if json {
                println!("{}", json!({ "added": file, "id": id }));
            } else {
                match id {
                    Some(id) => print::success(&format!("Added heading (:ID: {})", id)),
                    None => print::success(&format!("Added heading to {}", file.display())),
                }
            }
        }
        Commands::Agenda { todos, schedule } => {
            let view = if todos {
                AgendaView::Todos
            } else if schedule {
                AgendaView::Schedule
            } else {
                AgendaView::Full
            };
            let report = api.read_agenda(view)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print::agenda(&report);
            }
        }
        Commands::Todo {
            file,
            locator,
            state,
            clear,
        } => {
            let locator = require_locator(&locator)?;
            let change = if clear {
                HeadingChange::SetTodo(None)
            } else {
                match state {
                    Some(state) => HeadingChange::SetTodo(Some(state)),
                    None => bail!("pass a state or --clear"),
                }
            };
            api.modify_heading(&file, &locator, change)?;
            if json {
                println!("{}", json!({ "modified": file }));
            } else {
                print::success("Updated TODO state");
            }
        }
        Commands::Prop {
            file,
            key,
            value,
            locator,
            remove,
        } => {
            let locator = require_locator(&locator)?;
            let change = if remove {
                HeadingChange::RemoveProperty(key)
            } else {
                match value {
                    Some(value) => HeadingChange::SetProperty { key, value },
                    None => bail!("pass a value or --remove"),
                }
            };
            api.modify_heading(&file, &locator, change)?;
            if json {
                println!("{}", json!({ "modified": file }));
            } else {
                print::success("Updated properties");
            }
        }
        Commands::Body {
            file,
            text,
            locator,
        } => {
            let locator = require_locator(&locator)?;
            let mut body = text;
            if !body.is_empty() && !body.ends_with('\n') {
                body.push('\n');
            }
            api.modify_heading(&file, &locator, HeadingChange::ReplaceBody(body))?;
            if json {
                println!("{}", json!({ "modified": file }));
            } else {
                print::success("Replaced body");
            }
        }
    }
    Ok(())
}
