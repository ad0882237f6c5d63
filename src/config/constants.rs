//! # climdex Configuration Constants
//!
//! This module centralizes all configuration constants, grouping interdependent
//! values together and documenting their relationships.
//!
//! ## Dependency Graph
//!
//! ```text
//! DEFAULT_KEY_TOLERANCE (0.1)
//!       │
//!       ├─> AvlIndex::search        (approximate key match)
//!       ├─> AvlIndex::remove        (locate step before structural delete)
//!       └─> AvlIndex::level_of      (re-descent must agree with search)
//!
//! DUPLICATE_KEY_EPSILON (0.001)
//!       │
//!       └─> DuplicatePolicy::Perturb
//!             Must be well below DEFAULT_KEY_TOLERANCE so a perturbed
//!             record is still found by a search for its original key.
//!
//! EXPECTED_MAX_DEPTH (12)
//!       │
//!       └─> SmallVec inline capacity for descent scratch stacks.
//!           An AVL tree of height 12 holds at least 376 records; deeper
//!           trees spill to the heap, they do not fail.
//! ```

/// Default tolerance for approximate key equality.
///
/// Keys are floating-point values derived from column averages, so exact-bit
/// equality is the wrong test. A node matches a searched key when
/// `|node.key - key| < tolerance`. Overridable per index via
/// [`AvlIndex::with_tolerance`](crate::tree::AvlIndex::with_tolerance).
pub const DEFAULT_KEY_TOLERANCE: f64 = 0.1;

/// Offset added to a colliding key under
/// [`DuplicatePolicy::Perturb`](crate::tree::DuplicatePolicy::Perturb),
/// repeated until the key is distinct from every stored key.
pub const DUPLICATE_KEY_EPSILON: f64 = 0.001;

/// Inline capacity for descent path stacks (`SmallVec<[NodeId; _]>`).
///
/// AVL height is bounded by ~1.44·log2(n + 2), so 12 levels cover several
/// hundred records without heap allocation.
pub const EXPECTED_MAX_DEPTH: usize = 12;

/// Level number assigned to the root by `level_of` and `level_order`.
pub const ROOT_LEVEL: usize = 1;

/// Default CSV header naming the record code column.
pub const DEFAULT_CODE_COLUMN: &str = "ISO3";

/// Default CSV header naming the record display-name column.
pub const DEFAULT_NAME_COLUMN: &str = "Country";

/// Default prefix of CSV value columns that are averaged into the key.
/// The original dataset names them `F1961`..`F2022`.
pub const DEFAULT_VALUE_PREFIX: &str = "F";
