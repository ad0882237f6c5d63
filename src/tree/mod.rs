//! # AVL Record Index
//!
//! This module implements the core balanced index: a self-balancing binary
//! search tree (AVL) over records identified by a short code and ordered by
//! a floating-point key, with an auxiliary membership list mirroring the
//! tree for linear-scan queries.
//!
//! ## Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────────┐
//!                 │           AvlIndex            │
//!                 │  root: Option<NodeId>         │
//!                 │  members: Vec<NodeId>         │
//!                 ├───────────────────────────────┤
//!                 │           NodeArena           │
//!                 │  Vec-backed slab + free list  │
//!                 └───────────────────────────────┘
//!
//!                       [USA 12.8]  h=3
//!                       /         \
//!               [CAN 3.7]         [COL 24.5]
//!                                       \
//!                                   [BRA 26.2]
//! ```
//!
//! Nodes reference each other by [`NodeId`] (arena index). Child links are
//! owning by convention (exactly one parent slot refers to each live node)
//! and parent links are non-owning back-references that every structural
//! mutation (insert, delete, rotation) recomputes before it returns.
//!
//! ## Invariants
//!
//! After every public operation:
//!
//! 1. **BST order**: left-subtree keys < node key < right-subtree keys.
//!    Exactly-equal keys are never stored; see [`DuplicatePolicy`].
//! 2. **AVL balance**: |height(left) − height(right)| ≤ 1 at every node.
//! 3. **Height memo**: each node's stored height is 1 + max(child heights).
//! 4. **Parent consistency**: exactly one of the parent's child slots points
//!    back at each non-root node; the root has no parent.
//! 5. **Membership mirror**: the list holds exactly the records reachable
//!    from the root, no duplicates.
//!
//! [`AvlIndex::check_invariants`] asserts all five and panics on a breach.
//!
//! ## Approximate Key Equality
//!
//! Keys are floating-point averages, so `search`, `remove`, and `level_of`
//! match within a configurable tolerance (default 0.1) instead of testing
//! bit equality. Insertion, by contrast, compares exactly: the duplicate
//! policy decides whether an exactly-equal incoming key is rejected or
//! perturbed into an adjacent one.
//!
//! ## Deletion and Node Identity
//!
//! Deletion uses copy-up: removing a record with two children copies the
//! in-order successor's code/name/key into the victim's slot and then
//! deletes the successor's original slot. A [`NodeId`] held across a
//! `remove` call may therefore refer to different logical data afterwards.
//! Hold codes and re-resolve through [`AvlIndex::find_by_code`] when stable
//! references matter.
//!
//! ## Complexity
//!
//! | Operation                        | Cost        |
//! |----------------------------------|-------------|
//! | `insert`, `remove`, `search`     | O(log n)    |
//! | `parent` / `grandparent` / `uncle` | O(1)      |
//! | `level_of`                       | O(log n)    |
//! | `level_order`, `in_order`        | O(n)        |
//! | `find_by_code`, `find_by_name`, `at_least` | O(n) list scan |
//! | `statistics`                     | O(n log n)  |
//!
//! ## Thread Safety
//!
//! `AvlIndex` is not thread-safe and takes `&mut self` for every mutation.
//! A host application that shares an index must guard the whole value with
//! a single external lock.

mod arena;
mod invariants;
mod tree;

pub use arena::{Node, NodeId};
pub use tree::{AvlIndex, DuplicatePolicy, KeyStats, SearchTrace};
