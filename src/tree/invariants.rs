//! Whole-structure validation.
//!
//! Every public mutation of [`AvlIndex`] promises to leave the structure
//! satisfying the BST-order, AVL-balance, height-memo, parent-consistency,
//! and membership-mirror invariants. A breach is a defect in this crate, not
//! a caller error, so validation fails loudly with a panic instead of
//! returning a recoverable error; the rest of the system trusts these
//! invariants unconditionally.
//!
//! Intended for tests and debugging; it walks the whole tree (O(n)).

use std::collections::HashSet;

use super::arena::NodeId;
use super::tree::AvlIndex;

impl AvlIndex {
    /// Assert every structural invariant. Panics on the first violation.
    pub fn check_invariants(&self) {
        if let Some(root) = self.root {
            assert!(
                self.arena[root].parent().is_none(),
                "root {:?} has a parent back-reference",
                root
            );
        }

        let mut seen = HashSet::new();
        self.check_subtree(self.root, None, None, &mut seen);

        assert_eq!(
            seen.len(),
            self.members.len(),
            "membership list size {} != {} nodes reachable from the root",
            self.members.len(),
            seen.len()
        );
        let mut listed = HashSet::new();
        for &id in &self.members {
            assert!(listed.insert(id), "membership list contains {:?} twice", id);
            assert!(
                seen.contains(&id),
                "membership list entry {:?} is not reachable from the root",
                id
            );
        }
    }

    /// Recursively validate the subtree at `node` against open key bounds,
    /// returning its true height. Records every visited id in `seen`.
    fn check_subtree(
        &self,
        node: Option<NodeId>,
        lower: Option<f64>,
        upper: Option<f64>,
        seen: &mut HashSet<NodeId>,
    ) -> u32 {
        let id = match node {
            Some(id) => id,
            None => return 0,
        };
        assert!(
            seen.insert(id),
            "node {:?} is reachable through two different child links",
            id
        );

        let n = &self.arena[id];
        if let Some(lower) = lower {
            assert!(
                n.key() > lower,
                "BST order violated at {:?}: key {} <= lower bound {}",
                id,
                n.key(),
                lower
            );
        }
        if let Some(upper) = upper {
            assert!(
                n.key() < upper,
                "BST order violated at {:?}: key {} >= upper bound {}",
                id,
                n.key(),
                upper
            );
        }

        for child in [n.left(), n.right()].into_iter().flatten() {
            assert_eq!(
                self.arena[child].parent(),
                Some(id),
                "child {:?} does not point back at its parent {:?}",
                child,
                id
            );
        }

        let left_height = self.check_subtree(n.left(), lower, Some(n.key()), seen);
        let right_height = self.check_subtree(n.right(), Some(n.key()), upper, seen);

        let height = 1 + left_height.max(right_height);
        assert_eq!(
            n.height(),
            height,
            "stale height memo at {:?}: stored {}, actual {}",
            id,
            n.height(),
            height
        );

        let balance = left_height as i32 - right_height as i32;
        assert!(
            balance.abs() <= 1,
            "AVL balance violated at {:?}: factor {}",
            id,
            balance
        );

        height
    }
}
