//! # Node Arena
//!
//! Slab storage for AVL tree nodes. Nodes live in a `Vec` and link to each
//! other through [`NodeId`] indices instead of owning pointers.
//!
//! ## Why an Arena?
//!
//! The tree needs parent back-references, and a `Box`-owned tree cannot hold
//! a child→parent edge without reference counting or raw pointers. Storing
//! nodes in a slab makes child links owning *by convention* (exactly one
//! parent slot refers to each live node) and parent links plain indices that
//! the structural operations recompute on every mutation.
//!
//! As a side effect, rotations become a handful of index writes with no
//! allocation and good cache locality.
//!
//! ## Free List
//!
//! Removed slots are threaded into a free list and reused by the next
//! insertion, so a long insert/delete workload does not grow the slab
//! unboundedly. A [`NodeId`] is only valid while its record is alive; the
//! tree never hands out ids for vacant slots.

use std::ops::{Index, IndexMut};

/// Handle to a node in the arena.
///
/// Cheap to copy and compare. Valid only as long as the referenced record is
/// alive; the slot is reused after the record is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the underlying slab.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A record stored in the tree.
///
/// Carries the indexed data (`code`, `name`, `key`), the memoized subtree
/// height, and the structural links. Links are exposed read-only; only the
/// tree's structural operations may rewrite them.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) key: f64,
    pub(crate) height: u32,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(code: String, name: String, key: f64) -> Self {
        Self {
            code,
            name,
            key,
            height: 1,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Short unique identifier (e.g. an ISO3 country code).
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name. Opaque to the ordering.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordering key.
    pub fn key(&self) -> f64 {
        self.key
    }

    /// Memoized height of the subtree rooted here (leaf = 1).
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<u32> },
}

/// Slab of nodes with slot reuse.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Insert a node, reusing a vacant slot when one exists.
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;
        match self.free_head {
            Some(index) => {
                let next = match self.slots[index as usize] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
                };
                self.free_head = next;
                self.slots[index as usize] = Slot::Occupied(node);
                NodeId(index)
            }
            None => {
                let index = self.slots.len();
                assert!(index <= u32::MAX as usize, "node arena exceeded u32 capacity");
                self.slots.push(Slot::Occupied(node));
                NodeId::from_index(index)
            }
        }
    }

    /// Remove a node, returning it and threading its slot into the free list.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a vacant slot.
    pub fn remove(&mut self, id: NodeId) -> Node {
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => panic!("removed a vacant arena slot: {:?}", id),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Iterate over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Occupied(node) => Some((NodeId::from_index(i), node)),
            Slot::Vacant { .. } => None,
        })
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("indexed a vacant arena slot: {:?}", id),
        }
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("indexed a vacant arena slot: {:?}", id),
        }
    }
}
