//! # climdex - Embedded AVL Record Index
//!
//! climdex indexes records identified by a short code (originally: countries
//! by ISO3) and ordered by a floating-point key (originally: mean surface
//! temperature averaged from yearly measurements). The core is a
//! self-balancing AVL tree with explicit parent back-references, paired with
//! a flat membership list for the lookups key order cannot serve.
//!
//! ## Quick Start
//!
//! ```
//! use climdex::tree::AvlIndex;
//!
//! let mut index = AvlIndex::new();
//! index.insert("COL", "Colombia", 24.5)?;
//! index.insert("USA", "United States", 12.8)?;
//! index.insert("CAN", "Canada", 3.7)?;
//!
//! let hit = index.search(12.8).expect("within tolerance");
//! assert_eq!(index.get(hit).unwrap().code(), "USA");
//!
//! assert!(index.remove(3.7));
//! assert!(index.find_by_code("CAN").is_none());
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        CLI / REPL (bin, cli)        │
//! ├──────────────┬──────────────────────┤
//! │  CSV Loader  │  Graphviz/ASCII      │
//! │  (loader)    │  Rendering (render)  │
//! ├──────────────┴──────────────────────┤
//! │      Balanced Index (tree)          │
//! │  AVL tree + membership list,        │
//! │  arena-backed, parent links         │
//! └─────────────────────────────────────┘
//! ```
//!
//! The tree module is the only algorithmically interesting layer; loader,
//! renderer, and CLI consume its public API and can be replaced without
//! touching an invariant.
//!
//! ## Error Model
//!
//! - Absent keys/codes are `Option`/`bool` results, never errors.
//! - Duplicate keys fail `insert` with an [`eyre`] error under the default
//!   rejecting policy; an opt-in perturbing policy stores them at adjacent
//!   keys instead.
//! - A structural invariant breach is a bug in this crate and panics
//!   (`AvlIndex::check_invariants`), never silently corrupts.
//!
//! ## Module Overview
//!
//! - [`tree`]: the AVL index: insert/delete/search, ancestor queries,
//!   traversals, statistics, invariant checking
//! - [`loader`]: CSV ingestion and column averaging
//! - [`render`]: Graphviz DOT and ASCII tree rendering
//! - [`cli`]: interactive REPL, command parsing, table output
//! - [`config`]: centralized constants (tolerances, epsilons, defaults)

pub mod cli;
pub mod config;
pub mod loader;
pub mod render;
pub mod tree;

pub use tree::{AvlIndex, DuplicatePolicy, KeyStats, Node, NodeId, SearchTrace};
