//! Core AVL index operations: insertion, deletion, search, ancestor queries,
//! traversals, and key statistics.

use std::collections::VecDeque;

use eyre::{bail, ensure, Result};
use smallvec::SmallVec;

use super::arena::{Node, NodeArena, NodeId};
use crate::config::{
    DEFAULT_KEY_TOLERANCE, DUPLICATE_KEY_EPSILON, EXPECTED_MAX_DEPTH, ROOT_LEVEL,
};

/// Descent scratch stack. Inline for any realistically deep tree.
type PathStack = SmallVec<[NodeId; EXPECTED_MAX_DEPTH]>;

/// What `insert` does when the incoming key is exactly equal to a stored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the insertion and leave the index unmodified. The safer contract
    /// and the default.
    #[default]
    Reject,
    /// Bump the incoming key by [`DUPLICATE_KEY_EPSILON`] until it is
    /// distinct from every stored key, producing an ordering-adjacent record.
    /// The stored key then differs from the one the caller passed in.
    Perturb,
}

/// Every node visited by a tolerance search, in descent order, plus the
/// outcome. Consumed by the renderer to draw search paths.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    pub visited: Vec<NodeId>,
    pub found: Option<NodeId>,
}

/// Summary statistics over all indexed keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// A height-balanced (AVL) index of records ordered by a floating-point key.
///
/// The index owns two views of the same record set, kept in lockstep:
///
/// - the tree, for O(log n) key-ordered operations, and
/// - a flat membership list, for linear scans that the key order cannot
///   serve (code lookup, name substring search, threshold filters).
///
/// Nodes live in an arena ([`NodeId`] handles); child links are owning
/// indices and parent links are back-references recomputed by every
/// structural mutation. After every public operation returns, the structure
/// satisfies BST order, AVL balance, height memoization, and parent
/// consistency; [`check_invariants`](AvlIndex::check_invariants) asserts
/// all of them.
///
/// Key equality is approximate: `search`, `remove`, and `level_of` treat a
/// node as matching when `|node.key - key| < tolerance`. Keys here are
/// averages of measured values, so exact-bit comparison would be useless.
///
/// Not thread-safe. Wrap the whole index in a lock if a host application
/// shares it.
#[derive(Debug)]
pub struct AvlIndex {
    pub(super) arena: NodeArena,
    pub(super) root: Option<NodeId>,
    pub(super) members: Vec<NodeId>,
    tolerance: f64,
    duplicates: DuplicatePolicy,
}

impl Default for AvlIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AvlIndex {
    /// Create an empty index with [`DEFAULT_KEY_TOLERANCE`] and the
    /// rejecting duplicate policy.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            members: Vec::new(),
            tolerance: DEFAULT_KEY_TOLERANCE,
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Override the approximate-equality tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the duplicate-key policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Height of the whole tree (0 when empty).
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Read access to a record. `None` if the id no longer refers to a live
    /// record.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Membership list: every live record, order unspecified.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// `height(left) - height(right)` for a live node.
    pub fn balance_factor(&self, id: NodeId) -> i32 {
        let node = &self.arena[id];
        self.height_of(node.left) as i32 - self.height_of(node.right) as i32
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.arena[id].height)
    }

    fn update_height(&mut self, id: NodeId) {
        let node = &self.arena[id];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.arena[id].height = height;
    }

    // ---- insertion ----------------------------------------------------

    /// Insert a record, rebalancing as needed.
    ///
    /// Fails on a non-finite key, or on an exactly-equal stored key under
    /// [`DuplicatePolicy::Reject`]; the index is left unmodified in both
    /// cases. Under [`DuplicatePolicy::Perturb`] the key is nudged upward
    /// until distinct, so the stored key may differ from `key` by a few
    /// multiples of [`DUPLICATE_KEY_EPSILON`].
    pub fn insert(&mut self, code: &str, name: &str, key: f64) -> Result<NodeId> {
        ensure!(key.is_finite(), "key must be a finite number, got {}", key);

        let key = match self.duplicates {
            DuplicatePolicy::Reject => {
                if self.contains_exact(key) {
                    bail!("duplicate key {}: a record with this key is already indexed", key);
                }
                key
            }
            DuplicatePolicy::Perturb => {
                let mut candidate = key;
                while self.contains_exact(candidate) {
                    candidate += DUPLICATE_KEY_EPSILON;
                }
                candidate
            }
        };

        let (subroot, new_id) = self.insert_rec(self.root, code, name, key);
        self.arena[subroot].parent = None;
        self.root = Some(subroot);
        Ok(new_id)
    }

    /// True if some stored key is exactly (bit-for-bit after comparison)
    /// equal to `key`. Exact, not tolerance-based: this guards the BST
    /// strict-ordering invariant, not user-facing search.
    fn contains_exact(&self, key: f64) -> bool {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.arena[id];
            if key == node.key {
                return true;
            }
            cur = if key < node.key { node.left } else { node.right };
        }
        false
    }

    fn insert_rec(
        &mut self,
        node: Option<NodeId>,
        code: &str,
        name: &str,
        key: f64,
    ) -> (NodeId, NodeId) {
        let id = match node {
            Some(id) => id,
            None => {
                let new_id = self
                    .arena
                    .insert(Node::new(code.to_string(), name.to_string(), key));
                self.members.push(new_id);
                return (new_id, new_id);
            }
        };

        // Keys are pre-resolved to be distinct, so the descent is a strict
        // two-way branch.
        if key < self.arena[id].key {
            let (child, new_id) = self.insert_rec(self.arena[id].left, code, name, key);
            self.arena[id].left = Some(child);
            self.arena[child].parent = Some(id);
            self.update_height(id);
            (self.rebalance_after_insert(id, key), new_id)
        } else {
            let (child, new_id) = self.insert_rec(self.arena[id].right, code, name, key);
            self.arena[id].right = Some(child);
            self.arena[child].parent = Some(id);
            self.update_height(id);
            (self.rebalance_after_insert(id, key), new_id)
        }
    }

    /// Insert-time four-case rotation table, driven by where the new key
    /// went. Returns the (possibly new) root of this subtree.
    fn rebalance_after_insert(&mut self, id: NodeId, key: f64) -> NodeId {
        let balance = self.balance_factor(id);

        if balance > 1 {
            let left = self.arena[id].left.expect("left-heavy node has a left child");
            if key < self.arena[left].key {
                // left-left
                self.rotate_right(id)
            } else {
                // left-right
                let new_left = self.rotate_left(left);
                self.arena[id].left = Some(new_left);
                self.arena[new_left].parent = Some(id);
                self.rotate_right(id)
            }
        } else if balance < -1 {
            let right = self.arena[id].right.expect("right-heavy node has a right child");
            if key > self.arena[right].key {
                // right-right
                self.rotate_left(id)
            } else {
                // right-left
                let new_right = self.rotate_right(right);
                self.arena[id].right = Some(new_right);
                self.arena[new_right].parent = Some(id);
                self.rotate_left(id)
            }
        } else {
            id
        }
    }

    // ---- rotations ----------------------------------------------------

    /// Right rotation at `y`: its left child `x` takes `y`'s position, `y`
    /// becomes `x`'s right child, and `x`'s former right subtree moves under
    /// `y`. Parent links of all three participants are rewritten; heights
    /// are recomputed child-first. The caller re-attaches the returned
    /// subtree root to the grandparent.
    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let x = self.arena[y].left.expect("right rotation requires a left child");
        let t2 = self.arena[x].right;

        self.arena[x].right = Some(y);
        self.arena[y].left = t2;

        self.arena[x].parent = self.arena[y].parent;
        self.arena[y].parent = Some(x);
        if let Some(t2) = t2 {
            self.arena[t2].parent = Some(y);
        }

        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.arena[x].right.expect("left rotation requires a right child");
        let t2 = self.arena[y].left;

        self.arena[y].left = Some(x);
        self.arena[x].right = t2;

        self.arena[y].parent = self.arena[x].parent;
        self.arena[x].parent = Some(y);
        if let Some(t2) = t2 {
            self.arena[t2].parent = Some(x);
        }

        self.update_height(x);
        self.update_height(y);
        y
    }

    // ---- search -------------------------------------------------------

    /// Find a record whose key is within `tolerance` of `key`. O(height).
    pub fn search(&self, key: f64) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.arena[id];
            if (node.key - key).abs() < self.tolerance {
                return Some(id);
            }
            cur = if key < node.key { node.left } else { node.right };
        }
        None
    }

    /// Like [`search`](Self::search), but records every node visited on the
    /// way down. The trace ends with the matching node when the search
    /// succeeds.
    pub fn search_path(&self, key: f64) -> SearchTrace {
        let mut visited = Vec::new();
        let mut cur = self.root;
        while let Some(id) = cur {
            visited.push(id);
            let node = &self.arena[id];
            if (node.key - key).abs() < self.tolerance {
                return SearchTrace {
                    visited,
                    found: Some(id),
                };
            }
            cur = if key < node.key { node.left } else { node.right };
        }
        SearchTrace {
            visited,
            found: None,
        }
    }

    /// Look a record up by code, case-insensitively. Linear scan of the
    /// membership list.
    pub fn find_by_code(&self, code: &str) -> Option<NodeId> {
        self.members
            .iter()
            .copied()
            .find(|&id| self.arena[id].code.eq_ignore_ascii_case(code))
    }

    /// All records whose name contains `fragment`, case-insensitively, in
    /// membership order.
    pub fn find_by_name(&self, fragment: &str) -> Vec<NodeId> {
        let needle = fragment.to_lowercase();
        self.members
            .iter()
            .copied()
            .filter(|&id| self.arena[id].name.to_lowercase().contains(&needle))
            .collect()
    }

    /// All records with `key >= threshold`, sorted by key descending.
    /// Ties keep membership order (the sort is stable).
    pub fn at_least(&self, threshold: f64) -> Vec<NodeId> {
        let mut matches: Vec<NodeId> = self
            .members
            .iter()
            .copied()
            .filter(|&id| self.arena[id].key >= threshold)
            .collect();
        matches.sort_by(|&a, &b| self.arena[b].key.total_cmp(&self.arena[a].key));
        matches
    }

    // ---- deletion -----------------------------------------------------

    /// Delete the record whose key matches `key` within tolerance.
    ///
    /// Returns `false` (and mutates nothing) when no record matches.
    /// Deletion of a record with two children copies the in-order
    /// successor's identity into the victim's slot, so node identity is not
    /// stable across removals: hold codes, not [`NodeId`]s, across calls and
    /// re-resolve via [`find_by_code`](Self::find_by_code).
    pub fn remove(&mut self, key: f64) -> bool {
        let target = match self.search(key) {
            Some(id) => id,
            None => return false,
        };
        // Delete by the stored key with exact comparison, so the structural
        // walk finds exactly the record the tolerance search reported.
        let exact = self.arena[target].key;

        self.root = self.remove_rec(self.root, exact);
        if let Some(root) = self.root {
            self.arena[root].parent = None;
        }
        true
    }

    fn remove_rec(&mut self, node: Option<NodeId>, key: f64) -> Option<NodeId> {
        let id = node?;

        if key < self.arena[id].key {
            let new_left = self.remove_rec(self.arena[id].left, key);
            self.arena[id].left = new_left;
            if let Some(left) = new_left {
                self.arena[left].parent = Some(id);
            }
        } else if key > self.arena[id].key {
            let new_right = self.remove_rec(self.arena[id].right, key);
            self.arena[id].right = new_right;
            if let Some(right) = new_right {
                self.arena[right].parent = Some(id);
            }
        } else {
            match (self.arena[id].left, self.arena[id].right) {
                (None, None) => {
                    self.discard(id);
                    return None;
                }
                (Some(child), None) | (None, Some(child)) => {
                    // Absorb the only child's identity, then delete that
                    // child's original slot from the subtree. The child is
                    // necessarily a leaf (AVL balance), so the recursion
                    // bottoms out immediately, but routing it through
                    // remove_rec keeps parent maintenance in one place.
                    let was_left = self.arena[id].left.is_some();
                    let (code, name, child_key) = {
                        let c = &self.arena[child];
                        (c.code.clone(), c.name.clone(), c.key)
                    };
                    let target = &mut self.arena[id];
                    target.code = code;
                    target.name = name;
                    target.key = child_key;

                    let new_child = self.remove_rec(Some(child), child_key);
                    if was_left {
                        self.arena[id].left = new_child;
                    } else {
                        self.arena[id].right = new_child;
                    }
                    if let Some(c) = new_child {
                        self.arena[c].parent = Some(id);
                    }
                }
                (Some(_), Some(right)) => {
                    // Copy the in-order successor up, then delete its
                    // original slot from the right subtree.
                    let successor = self.min_node(right);
                    let (code, name, succ_key) = {
                        let s = &self.arena[successor];
                        (s.code.clone(), s.name.clone(), s.key)
                    };
                    let target = &mut self.arena[id];
                    target.code = code;
                    target.name = name;
                    target.key = succ_key;

                    let new_right = self.remove_rec(Some(right), succ_key);
                    self.arena[id].right = new_right;
                    if let Some(r) = new_right {
                        self.arena[r].parent = Some(id);
                    }
                }
            }
        }

        self.update_height(id);
        Some(self.rebalance_after_remove(id))
    }

    /// Delete-time rotation table. Unlike insertion, the case split tests
    /// the child subtree's own balance factor (with `>= 0` / `<= 0`
    /// thresholds): after a removal the imbalance is structural, not tied to
    /// where a value went.
    fn rebalance_after_remove(&mut self, id: NodeId) -> NodeId {
        let balance = self.balance_factor(id);

        if balance > 1 {
            let left = self.arena[id].left.expect("left-heavy node has a left child");
            if self.balance_factor(left) >= 0 {
                self.rotate_right(id)
            } else {
                let new_left = self.rotate_left(left);
                self.arena[id].left = Some(new_left);
                self.arena[new_left].parent = Some(id);
                self.rotate_right(id)
            }
        } else if balance < -1 {
            let right = self.arena[id].right.expect("right-heavy node has a right child");
            if self.balance_factor(right) <= 0 {
                self.rotate_left(id)
            } else {
                let new_right = self.rotate_right(right);
                self.arena[id].right = Some(new_right);
                self.arena[new_right].parent = Some(id);
                self.rotate_left(id)
            }
        } else {
            id
        }
    }

    /// Leftmost descendant of `id`.
    fn min_node(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(left) = self.arena[cur].left {
            cur = left;
        }
        cur
    }

    /// Free an arena slot and drop it from the membership list.
    fn discard(&mut self, id: NodeId) {
        if let Some(pos) = self.members.iter().position(|&m| m == id) {
            self.members.swap_remove(pos);
        }
        self.arena.remove(id);
    }

    // ---- ancestor queries ---------------------------------------------

    /// Structural parent, via the stored back-reference. O(1).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn grandparent(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).and_then(|p| self.parent(p))
    }

    /// The parent's sibling: the grandparent's other child, when both hops
    /// exist.
    pub fn uncle(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let grandparent = self.parent(parent)?;
        let g = &self.arena[grandparent];
        if g.left == Some(parent) {
            g.right
        } else {
            g.left
        }
    }

    /// Depth of the record, counted from the root at level 1.
    ///
    /// Computed by re-descending from the root with the search tolerance
    /// (not by walking parent links), so the answer is consistent with what
    /// [`search`](Self::search) would find for this record's key.
    pub fn level_of(&self, id: NodeId) -> Option<usize> {
        let key = self.arena.get(id)?.key;
        let mut level = ROOT_LEVEL;
        let mut cur = self.root;
        while let Some(nid) = cur {
            let node = &self.arena[nid];
            if (node.key - key).abs() < self.tolerance {
                return Some(level);
            }
            cur = if key < node.key { node.left } else { node.right };
            level += 1;
        }
        None
    }

    // ---- traversals ---------------------------------------------------

    /// Nodes grouped by depth, left to right within each level. Breadth-first,
    /// O(n) total.
    pub fn level_order(&self) -> Vec<Vec<NodeId>> {
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        let root = match self.root {
            Some(root) => root,
            None => return levels,
        };

        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        queue.push_back((root, 0));
        while let Some((id, depth)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(id);

            let node = &self.arena[id];
            if let Some(left) = node.left {
                queue.push_back((left, depth + 1));
            }
            if let Some(right) = node.right {
                queue.push_back((right, depth + 1));
            }
        }
        levels
    }

    /// All nodes in ascending key order.
    pub fn in_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: PathStack = SmallVec::new();
        let mut cur = self.root;

        while cur.is_some() || !stack.is_empty() {
            while let Some(id) = cur {
                stack.push(id);
                cur = self.arena[id].left;
            }
            let id = stack.pop().expect("stack non-empty by loop condition");
            out.push(id);
            cur = self.arena[id].right;
        }
        out
    }

    // ---- statistics ---------------------------------------------------

    /// Count, min, max, mean, and median over all indexed keys. `None` when
    /// the index is empty. The median of an even count averages the two
    /// middle keys.
    pub fn statistics(&self) -> Option<KeyStats> {
        if self.members.is_empty() {
            return None;
        }

        let mut keys: Vec<f64> = self.members.iter().map(|&id| self.arena[id].key).collect();
        keys.sort_by(f64::total_cmp);

        let count = keys.len();
        let mean = keys.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            keys[count / 2]
        } else {
            (keys[count / 2 - 1] + keys[count / 2]) / 2.0
        };

        Some(KeyStats {
            count,
            min: keys[0],
            max: keys[count - 1],
            mean,
            median,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_exact_is_bit_exact() {
        let mut index = AvlIndex::new();
        index.insert("A", "Alpha", 10.0).unwrap();

        assert!(index.contains_exact(10.0));
        assert!(!index.contains_exact(10.05)); // within tolerance, not exact
    }

    #[test]
    fn perturb_resolves_to_a_distinct_key() {
        let mut index = AvlIndex::new().with_duplicate_policy(DuplicatePolicy::Perturb);
        let first = index.insert("A", "Alpha", 10.0).unwrap();
        let second = index.insert("B", "Beta", 10.0).unwrap();

        let a = index.get(first).unwrap().key();
        let b = index.get(second).unwrap().key();
        assert_ne!(a, b);
        assert!((b - a).abs() < DEFAULT_KEY_TOLERANCE);
    }

    #[test]
    fn reject_leaves_index_unmodified() {
        let mut index = AvlIndex::new();
        index.insert("A", "Alpha", 10.0).unwrap();

        let err = index.insert("B", "Beta", 10.0).unwrap_err();
        assert!(err.to_string().contains("duplicate key"));
        assert_eq!(index.len(), 1);
        assert!(index.find_by_code("B").is_none());
    }

    #[test]
    fn non_finite_keys_are_rejected() {
        let mut index = AvlIndex::new();
        assert!(index.insert("A", "Alpha", f64::NAN).is_err());
        assert!(index.insert("A", "Alpha", f64::INFINITY).is_err());
        assert!(index.is_empty());
    }
}
