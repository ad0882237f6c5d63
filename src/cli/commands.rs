//! # Command Handler
//!
//! Parses and executes the REPL's commands against the record index.
//!
//! ## Parsing
//!
//! Commands are case-insensitive words followed by whitespace-separated
//! arguments. `insert` treats everything after the key as the record name,
//! so multi-word names need no quoting:
//!
//! ```text
//! insert USA 12.8 United States
//! ```
//!
//! ## Implementation
//!
//! Each command is a function returning a [`CommandResult`]:
//! - `Output`: text to display
//! - `Exit`: terminate the REPL
//! - `Error`: message to display without terminating
//!
//! Recoverable index conditions (key not found, duplicate key) come back as
//! `Output`/`Error` text; they never abort the session.

use std::fs;

use crate::loader::{load_into, CsvLoader};
use crate::render::{render_ascii, render_dot, render_search, DotOptions};
use crate::tree::{AvlIndex, NodeId};

use super::table::TableFormatter;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn execute(input: &str, index: &mut AvlIndex) -> CommandResult {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return CommandResult::Continue;
        }

        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "quit" | "exit" | "q" => CommandResult::Exit,
            "help" | "h" | "?" => CommandResult::Output(help_text()),
            "insert" => insert(index, args),
            "delete" => delete(index, args),
            "find" => find(index, args),
            "code" => by_code(index, args),
            "name" => by_name(index, args),
            "atleast" => at_least(index, args),
            "levels" => levels(index),
            "level" => level(index, args),
            "parent" => ancestor(index, args, Relation::Parent),
            "grandparent" => ancestor(index, args, Relation::Grandparent),
            "uncle" => ancestor(index, args, Relation::Uncle),
            "stats" => stats(index),
            "tree" => CommandResult::Output(render_ascii(index)),
            "dot" => dot(index, args),
            "trace" => trace(index, args),
            "load" => load(index, args),
            _ => CommandResult::Error(format!(
                "Unknown command: {}. Type help for available commands.",
                cmd
            )),
        }
    }
}

enum Relation {
    Parent,
    Grandparent,
    Uncle,
}

fn help_text() -> String {
    r#"climdex commands:

  insert CODE KEY NAME...  Insert a record (e.g. insert COL 24.5 Colombia)
  delete KEY               Delete the record whose key matches KEY
  find KEY                 Search by key (approximate, within tolerance)
  code CODE                Look a record up by its code
  name TEXT                Search record names for a substring
  atleast KEY              List records with key >= KEY, highest first
  levels                   Show the tree level by level
  level CODE               Show the depth of a record (root = 1)
  parent CODE              Show a record's parent
  grandparent CODE         Show a record's grandparent
  uncle CODE               Show a record's uncle
  stats                    Key statistics (count/min/max/mean/median)
  tree                     Print the tree as ASCII art
  dot [FILE]               Emit Graphviz DOT (to FILE if given)
  trace KEY [FILE]         Emit DOT with the search path for KEY highlighted
  load PATH                Load records from a CSV file
  help                     Show this help message
  quit                     Exit"#
        .to_string()
}

fn describe(index: &AvlIndex, id: NodeId) -> String {
    match index.get(id) {
        Some(node) => format!("{} - {} ({:.2})", node.code(), node.name(), node.key()),
        None => "<stale record>".to_string(),
    }
}

fn parse_key(arg: &str) -> Result<f64, CommandResult> {
    arg.parse::<f64>()
        .map_err(|_| CommandResult::Error(format!("Not a number: {}", arg)))
}

fn insert(index: &mut AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return CommandResult::Error("Usage: insert CODE KEY NAME...".to_string());
    }
    let code = args[0];
    let key = match parse_key(args[1]) {
        Ok(key) => key,
        Err(result) => return result,
    };
    let name = args[2..].join(" ");

    match index.insert(code, &name, key) {
        Ok(id) => CommandResult::Output(format!("Inserted {}", describe(index, id))),
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn delete(index: &mut AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: delete KEY".to_string());
    }
    let key = match parse_key(args[0]) {
        Ok(key) => key,
        Err(result) => return result,
    };

    if index.remove(key) {
        CommandResult::Output(format!("Deleted record matching {:.2}", key))
    } else {
        CommandResult::Output(format!("No record matches {:.2}", key))
    }
}

fn find(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: find KEY".to_string());
    }
    let key = match parse_key(args[0]) {
        Ok(key) => key,
        Err(result) => return result,
    };

    match index.search(key) {
        Some(id) => {
            let level = index
                .level_of(id)
                .map(|l| format!(", level {}", l))
                .unwrap_or_default();
            CommandResult::Output(format!("Found {}{}", describe(index, id), level))
        }
        None => CommandResult::Output(format!("No record matches {:.2}", key)),
    }
}

fn by_code(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: code CODE".to_string());
    }
    match index.find_by_code(args[0]) {
        Some(id) => CommandResult::Output(format!("Found {}", describe(index, id))),
        None => CommandResult::Output(format!("No record with code {}", args[0].to_uppercase())),
    }
}

fn by_name(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: name TEXT".to_string());
    }
    let fragment = args.join(" ");
    let matches = index.find_by_name(&fragment);
    if matches.is_empty() {
        return CommandResult::Output(format!("No record names contain {:?}", fragment));
    }

    let formatter = TableFormatter::records(index, &matches);
    CommandResult::Output(format!(
        "{}{} match{}",
        formatter.render(),
        formatter.row_count(),
        if formatter.row_count() == 1 { "" } else { "es" }
    ))
}

fn at_least(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: atleast KEY".to_string());
    }
    let threshold = match parse_key(args[0]) {
        Ok(key) => key,
        Err(result) => return result,
    };

    let matches = index.at_least(threshold);
    if matches.is_empty() {
        return CommandResult::Output(format!("No records with key >= {:.2}", threshold));
    }

    let formatter = TableFormatter::records(index, &matches);
    CommandResult::Output(format!(
        "{}{} record{}",
        formatter.render(),
        formatter.row_count(),
        if formatter.row_count() == 1 { "" } else { "s" }
    ))
}

fn levels(index: &AvlIndex) -> CommandResult {
    let levels = index.level_order();
    if levels.is_empty() {
        return CommandResult::Output("The tree is empty".to_string());
    }

    let mut out = String::new();
    for (depth, ids) in levels.iter().enumerate() {
        let entries: Vec<String> = ids
            .iter()
            .filter_map(|&id| index.get(id))
            .map(|node| format!("{}({:.1})", node.code(), node.key()))
            .collect();
        out.push_str(&format!("Level {}: {}\n", depth + 1, entries.join(" | ")));
    }
    CommandResult::Output(out)
}

fn level(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: level CODE".to_string());
    }
    let id = match index.find_by_code(args[0]) {
        Some(id) => id,
        None => {
            return CommandResult::Output(format!(
                "No record with code {}",
                args[0].to_uppercase()
            ))
        }
    };

    match index.level_of(id) {
        Some(level) => CommandResult::Output(format!(
            "{} is at level {}",
            describe(index, id),
            level
        )),
        None => CommandResult::Error(format!(
            "Record {} not reachable by key search",
            args[0].to_uppercase()
        )),
    }
}

fn ancestor(index: &AvlIndex, args: &[&str], relation: Relation) -> CommandResult {
    let (usage, label) = match relation {
        Relation::Parent => ("Usage: parent CODE", "parent"),
        Relation::Grandparent => ("Usage: grandparent CODE", "grandparent"),
        Relation::Uncle => ("Usage: uncle CODE", "uncle"),
    };
    if args.len() != 1 {
        return CommandResult::Error(usage.to_string());
    }
    let id = match index.find_by_code(args[0]) {
        Some(id) => id,
        None => {
            return CommandResult::Output(format!(
                "No record with code {}",
                args[0].to_uppercase()
            ))
        }
    };

    let related = match relation {
        Relation::Parent => index.parent(id),
        Relation::Grandparent => index.grandparent(id),
        Relation::Uncle => index.uncle(id),
    };

    match related {
        Some(rel) => CommandResult::Output(format!(
            "{} of {}: {}",
            label,
            describe(index, id),
            describe(index, rel)
        )),
        None => CommandResult::Output(format!("{} has no {}", describe(index, id), label)),
    }
}

fn stats(index: &AvlIndex) -> CommandResult {
    match index.statistics() {
        Some(stats) => CommandResult::Output(format!(
            "Records: {}\nMin key: {:.2}\nMax key: {:.2}\nMean:    {:.2}\nMedian:  {:.2}",
            stats.count, stats.min, stats.max, stats.mean, stats.median
        )),
        None => CommandResult::Output("The index is empty".to_string()),
    }
}

fn dot(index: &AvlIndex, args: &[&str]) -> CommandResult {
    let options = DotOptions {
        show_details: true,
        show_legend: true,
        ..DotOptions::default()
    };
    let rendered = render_dot(index, &options);
    emit_dot(rendered, args.first())
}

fn trace(index: &AvlIndex, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: trace KEY [FILE]".to_string());
    }
    let key = match parse_key(args[0]) {
        Ok(key) => key,
        Err(result) => return result,
    };
    emit_dot(render_search(index, key), args.get(1))
}

fn emit_dot(rendered: String, file: Option<&&str>) -> CommandResult {
    match file {
        Some(path) => match fs::write(path, &rendered) {
            Ok(()) => CommandResult::Output(format!(
                "Wrote {} (render with: dot -Tpng {} -o out.png)",
                path, path
            )),
            Err(err) => CommandResult::Error(format!("Could not write {}: {}", path, err)),
        },
        None => CommandResult::Output(rendered),
    }
}

fn load(index: &mut AvlIndex, args: &[&str]) -> CommandResult {
    if args.len() != 1 {
        return CommandResult::Error("Usage: load PATH".to_string());
    }

    match CsvLoader::new().load(args[0]) {
        Ok(records) => {
            let loaded = load_into(index, &records);
            CommandResult::Output(format!(
                "Loaded {} of {} records ({} total indexed)",
                loaded,
                records.len(),
                index.len()
            ))
        }
        Err(err) => CommandResult::Error(format!("{:#}", err)),
    }
}
