//! # climdex CLI Module
//!
//! Interactive command-line interface over the AVL record index. Supports:
//!
//! - Interactive command execution with persistent history
//! - ASCII table-formatted record listings
//! - Graphviz export of the tree and of search descents
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI Entry Point                        │
//! │                     (bin/climdex.rs)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         REPL Loop                           │
//! │  - Reads input via rustyline                                │
//! │  - Dispatches to the command handler                        │
//! │  - Prints results and errors                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │     Commands          │    Table Formatter    │   History   │
//! │  (insert, delete,     │  ASCII box drawing    │  Persistent │
//! │   find, stats, dot…)  │  for record lists     │  ~/.climdex*│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commands
//!
//! | Command                  | Description                                |
//! |--------------------------|--------------------------------------------|
//! | `insert CODE KEY NAME…`  | Insert a record                            |
//! | `delete KEY`             | Delete the record matching KEY             |
//! | `find KEY`               | Tolerance search by key                    |
//! | `code CODE`              | Look a record up by code                   |
//! | `name TEXT`              | Substring search over record names         |
//! | `atleast KEY`            | Records with key ≥ KEY, descending         |
//! | `levels`                 | Level-order listing                        |
//! | `level CODE`             | Depth of a record (root = 1)               |
//! | `parent` / `grandparent` / `uncle CODE` | Ancestor queries            |
//! | `stats`                  | Key statistics                             |
//! | `tree`                   | ASCII tree                                 |
//! | `dot [FILE]`             | Graphviz DOT of the tree                   |
//! | `trace KEY [FILE]`       | Graphviz DOT of a search descent           |
//! | `load PATH`              | Load a CSV dataset                         |
//! | `help`, `quit`           | The usual                                  |
//!
//! ## History
//!
//! Command history is persisted to `~/.climdex_history` by default,
//! overridable with the `CLIMDEX_HISTORY` environment variable.
//!
//! ## Module Organization
//!
//! - `repl`: Main read-eval-print loop with rustyline integration
//! - `commands`: Command parsing and execution
//! - `table`: ASCII table formatter for record lists
//! - `history`: History file path resolution

pub mod commands;
pub mod history;
pub mod repl;
pub mod table;

pub use repl::Repl;
