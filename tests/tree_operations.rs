//! # Index Operation Tests
//!
//! Source of truth for the AVL index's observable behavior: insertion and
//! rebalancing, tolerance search, copy-up deletion, ancestor queries,
//! traversals, and statistics. Every mutation scenario finishes with
//! `check_invariants`, which asserts BST order, AVL balance, height memos,
//! parent back-references, and the membership mirror in one sweep.

use climdex::loader::{load_into, sample_records};
use climdex::tree::{AvlIndex, DuplicatePolicy};

/// The four-record scenario used throughout: COL/USA/BRA/CAN by mean
/// temperature.
fn four_records() -> AvlIndex {
    let mut index = AvlIndex::new();
    index.insert("COL", "Colombia", 24.5).unwrap();
    index.insert("USA", "United States", 12.8).unwrap();
    index.insert("BRA", "Brazil", 26.2).unwrap();
    index.insert("CAN", "Canada", 3.7).unwrap();
    index.check_invariants();
    index
}

/// A perfectly balanced 7-node tree: ascending inserts of 10..=70 settle
/// into 40 at the root, 20/60 below, leaves 10/30/50/70.
fn seven_records() -> AvlIndex {
    let mut index = AvlIndex::new();
    for key in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0] {
        let code = format!("N{}", key as i32);
        index.insert(&code, &code, key).unwrap();
    }
    index.check_invariants();
    index
}

fn codes_in_order(index: &AvlIndex) -> Vec<String> {
    index
        .in_order()
        .iter()
        .map(|&id| index.get(id).unwrap().code().to_string())
        .collect()
}

fn keys_in_order(index: &AvlIndex) -> Vec<f64> {
    index
        .in_order()
        .iter()
        .map(|&id| index.get(id).unwrap().key())
        .collect()
}

mod insertion {
    use super::*;

    #[test]
    fn four_records_settle_balanced_and_ordered() {
        let index = four_records();

        assert_eq!(index.len(), 4);
        assert!(index.height() <= 3);
        assert_eq!(codes_in_order(&index), ["CAN", "USA", "COL", "BRA"]);
    }

    #[test]
    fn low_outlier_triggers_rotation_and_stays_sorted() {
        let mut index = four_records();
        index.insert("ANT", "Antarctica", -5.0).unwrap();
        index.check_invariants();

        assert_eq!(index.height(), 3);
        assert_eq!(codes_in_order(&index), ["ANT", "CAN", "USA", "COL", "BRA"]);
    }

    #[test]
    fn ascending_run_keeps_logarithmic_height() {
        let mut index = AvlIndex::new();
        for i in 0..100 {
            index.insert(&format!("R{:03}", i), "record", i as f64).unwrap();
        }
        index.check_invariants();

        let bound = (1.44 * (102.0f64).log2()).floor() as u32;
        assert!(
            index.height() <= bound,
            "height {} exceeds AVL bound {}",
            index.height(),
            bound
        );
    }

    #[test]
    fn descending_run_keeps_logarithmic_height() {
        let mut index = AvlIndex::new();
        for i in (0..100).rev() {
            index.insert(&format!("R{:03}", i), "record", i as f64).unwrap();
        }
        index.check_invariants();
        assert!(index.height() <= 9);
    }

    #[test]
    fn duplicate_key_is_rejected_by_default() {
        let mut index = four_records();
        let err = index.insert("PER", "Peru", 24.5).unwrap_err();

        assert!(err.to_string().contains("duplicate key"));
        assert_eq!(index.len(), 4);
        assert!(index.find_by_code("PER").is_none());
        index.check_invariants();
    }

    #[test]
    fn perturb_policy_stores_near_duplicates() {
        let mut index = AvlIndex::new().with_duplicate_policy(DuplicatePolicy::Perturb);
        index.insert("COL", "Colombia", 24.5).unwrap();
        index.insert("PER", "Peru", 24.5).unwrap();
        index.insert("ECU", "Ecuador", 24.5).unwrap();
        index.check_invariants();

        assert_eq!(index.len(), 3);
        let keys = keys_in_order(&index);
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "stored keys not distinct: {:?}", keys);
        // Perturbed keys stay ordering-adjacent to the original.
        assert!(keys.iter().all(|k| (k - 24.5).abs() < 0.01));
    }

    #[test]
    fn sample_dataset_loads_balanced() {
        let mut index = AvlIndex::new();
        assert_eq!(load_into(&mut index, &sample_records()), 10);
        index.check_invariants();
        assert!(index.height() <= 4);
    }
}

mod search {
    use super::*;

    #[test]
    fn round_trip_insert_search_delete() {
        let mut index = four_records();

        let hit = index.search(12.8).expect("just inserted");
        assert_eq!(index.get(hit).unwrap().code(), "USA");

        assert!(index.remove(12.8));
        index.check_invariants();
        assert!(index.search(12.8).is_none());
    }

    #[test]
    fn search_matches_within_tolerance_only() {
        let index = four_records();

        assert!(index.search(24.45).is_some()); // |24.5 - 24.45| < 0.1
        assert!(index.search(24.7).is_none()); // off by 0.2
    }

    #[test]
    fn tolerance_is_configurable() {
        let mut index = AvlIndex::new().with_tolerance(0.001);
        index.insert("COL", "Colombia", 24.5).unwrap();

        assert!(index.search(24.5).is_some());
        assert!(index.search(24.51).is_none());
    }

    #[test]
    fn search_path_records_the_descent() {
        let index = seven_records();
        let trace = index.search_path(10.0);

        let visited: Vec<f64> = trace
            .visited
            .iter()
            .map(|&id| index.get(id).unwrap().key())
            .collect();
        assert_eq!(visited, [40.0, 20.0, 10.0]);
        assert_eq!(trace.found, index.search(10.0));
    }

    #[test]
    fn failed_search_path_still_reports_visits() {
        let index = seven_records();
        let trace = index.search_path(35.0);

        assert!(trace.found.is_none());
        assert!(!trace.visited.is_empty());
        let last = *trace.visited.last().unwrap();
        assert_eq!(index.get(last).unwrap().key(), 30.0);
    }

    #[test]
    fn find_by_code_is_case_insensitive() {
        let index = four_records();

        let id = index.find_by_code("usa").expect("case-insensitive match");
        assert_eq!(index.get(id).unwrap().code(), "USA");
        assert!(index.find_by_code("XXX").is_none());
    }

    #[test]
    fn find_by_name_matches_substrings() {
        let index = four_records();

        let matches = index.find_by_name("bra");
        assert_eq!(matches.len(), 1);
        assert_eq!(index.get(matches[0]).unwrap().code(), "BRA");

        let states = index.find_by_name("STATES");
        assert_eq!(states.len(), 1);
        assert_eq!(index.get(states[0]).unwrap().code(), "USA");

        assert!(index.find_by_name("zzz").is_empty());
    }

    #[test]
    fn at_least_returns_descending_keys() {
        let index = four_records();

        let hot: Vec<String> = index
            .at_least(20.0)
            .iter()
            .map(|&id| index.get(id).unwrap().code().to_string())
            .collect();
        assert_eq!(hot, ["BRA", "COL"]);

        assert!(index.at_least(100.0).is_empty());
        assert_eq!(index.at_least(f64::MIN).len(), 4);
    }
}

mod deletion {
    use super::*;

    #[test]
    fn delete_one_child_node_absorbs_the_child() {
        let mut index = four_records();

        // USA (12.8) has one child, CAN (3.7).
        assert!(index.remove(12.8));
        index.check_invariants();

        assert!(index.find_by_code("USA").is_none());
        assert_eq!(index.len(), 3);
        assert_eq!(codes_in_order(&index), ["CAN", "COL", "BRA"]);
    }

    #[test]
    fn delete_leaf() {
        let mut index = four_records();

        assert!(index.remove(3.7));
        index.check_invariants();
        assert_eq!(codes_in_order(&index), ["USA", "COL", "BRA"]);
    }

    #[test]
    fn delete_two_child_node_promotes_the_successor() {
        let mut index = seven_records();

        // 40 is the root with two children; its in-order successor is 50.
        assert!(index.remove(40.0));
        index.check_invariants();

        let root = index.root().unwrap();
        assert_eq!(index.get(root).unwrap().key(), 50.0);
        assert!(index.find_by_code("N40").is_none());
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn delete_missing_key_mutates_nothing() {
        let mut index = four_records();

        assert!(!index.remove(99.0));
        assert_eq!(index.len(), 4);
        index.check_invariants();
    }

    #[test]
    fn drain_the_whole_tree() {
        let mut index = seven_records();

        while let Some(root) = index.root() {
            let key = index.get(root).unwrap().key();
            assert!(index.remove(key));
            index.check_invariants();
        }
        assert!(index.is_empty());
        assert!(index.members().is_empty());
        assert_eq!(index.height(), 0);
    }

    #[test]
    fn delete_rebalances_the_survivors() {
        let mut index = AvlIndex::new();
        for key in [50.0, 30.0, 70.0, 20.0, 40.0, 60.0, 80.0, 10.0] {
            index.insert(&format!("N{}", key as i32), "n", key).unwrap();
        }

        // Removing from the right side forces a left-heavy imbalance.
        assert!(index.remove(60.0));
        index.check_invariants();
        assert!(index.remove(80.0));
        index.check_invariants();
        assert!(index.remove(70.0));
        index.check_invariants();

        assert_eq!(index.len(), 5);
        let keys = keys_in_order(&index);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn membership_mirrors_the_tree_through_mixed_operations() {
        let mut index = AvlIndex::new();
        load_into(&mut index, &sample_records());

        assert!(index.remove(12.8));
        index.insert("PER", "Peru", 19.3).unwrap();
        assert!(index.remove(3.7));
        index.insert("NOR", "Norway", 1.5).unwrap();
        index.check_invariants();

        assert_eq!(index.members().len(), index.in_order().len());
        assert_eq!(index.len(), 10);
    }
}

mod ancestors {
    use super::*;

    #[test]
    fn parent_grandparent_uncle_on_the_balanced_seven() {
        let index = seven_records();
        let key_of = |id| index.get(id).unwrap().key();

        let leaf10 = index.find_by_code("N10").unwrap();
        let parent = index.parent(leaf10).unwrap();
        assert_eq!(key_of(parent), 20.0);

        let grandparent = index.grandparent(leaf10).unwrap();
        assert_eq!(key_of(grandparent), 40.0);

        let uncle = index.uncle(leaf10).unwrap();
        assert_eq!(key_of(uncle), 60.0);

        // Mirror side: 70's uncle is 20.
        let leaf70 = index.find_by_code("N70").unwrap();
        assert_eq!(key_of(index.uncle(leaf70).unwrap()), 20.0);
    }

    #[test]
    fn root_has_no_ancestors() {
        let index = seven_records();
        let root = index.root().unwrap();

        assert!(index.parent(root).is_none());
        assert!(index.grandparent(root).is_none());
        assert!(index.uncle(root).is_none());
    }

    #[test]
    fn depth_two_nodes_have_a_parent_but_no_grandparent() {
        let index = seven_records();
        let n20 = index.find_by_code("N20").unwrap();

        assert!(index.parent(n20).is_some());
        assert!(index.grandparent(n20).is_none());
        assert!(index.uncle(n20).is_none());
    }

    #[test]
    fn levels_count_from_the_root() {
        let index = seven_records();

        let root = index.root().unwrap();
        assert_eq!(index.level_of(root), Some(1));

        let n20 = index.find_by_code("N20").unwrap();
        assert_eq!(index.level_of(n20), Some(2));

        let n70 = index.find_by_code("N70").unwrap();
        assert_eq!(index.level_of(n70), Some(3));
    }

    #[test]
    fn level_order_lists_each_depth_left_to_right() {
        let index = seven_records();

        let levels: Vec<Vec<f64>> = index
            .level_order()
            .iter()
            .map(|ids| ids.iter().map(|&id| index.get(id).unwrap().key()).collect())
            .collect();

        assert_eq!(
            levels,
            [vec![40.0], vec![20.0, 60.0], vec![10.0, 30.0, 50.0, 70.0]]
        );
    }

    #[test]
    fn level_order_of_the_four_record_scenario() {
        let index = four_records();

        let levels: Vec<Vec<String>> = index
            .level_order()
            .iter()
            .map(|ids| {
                ids.iter()
                    .map(|&id| index.get(id).unwrap().code().to_string())
                    .collect()
            })
            .collect();

        assert_eq!(
            levels,
            [vec!["COL".to_string()], vec!["USA".into(), "BRA".into()], vec!["CAN".into()]]
        );
    }

    #[test]
    fn empty_tree_has_no_levels() {
        let index = AvlIndex::new();
        assert!(index.level_order().is_empty());
    }
}

mod statistics {
    use super::*;

    #[test]
    fn empty_index_has_no_statistics() {
        assert!(AvlIndex::new().statistics().is_none());
    }

    #[test]
    fn four_record_statistics() {
        let stats = four_records().statistics().unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 3.7);
        assert_eq!(stats.max, 26.2);
        assert!((stats.mean - 16.8).abs() < 1e-9);
        // Even count: median averages the middle pair (12.8, 24.5).
        assert!((stats.median - 18.65).abs() < 1e-9);
    }

    #[test]
    fn odd_count_median_is_the_middle_key() {
        let mut index = four_records();
        index.insert("MEX", "Mexico", 21.4).unwrap();

        let stats = index.statistics().unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 21.4);
    }

    #[test]
    fn statistics_track_deletions() {
        let mut index = four_records();
        assert!(index.remove(26.2));

        let stats = index.statistics().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max, 24.5);
    }
}
