mod common;

use common::dataset_for;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeSet, HashMap};
use tipmatch::model::{BranchLength, PhyloTree, VertexIndex};
use tipmatch::{check_tree, reconcile, subset_complete};

/// Random binary tree: `n` leaves joined pairwise in random order.
#[derive(Debug, Clone)]
struct Case {
    num_leaves: usize,
    merges: Vec<(Index, Index)>,
    lengths: Vec<f64>,
    in_data: Vec<bool>,
    num_extra: usize,
}

fn arb_case() -> impl Strategy<Value = Case> {
    (2usize..25).prop_flat_map(|n| {
        (
            vec((any::<Index>(), any::<Index>()), n - 1),
            vec(0.01f64..5.0, 2 * n - 1),
            vec(any::<bool>(), n),
            0usize..4,
        )
            .prop_map(move |(merges, lengths, in_data, num_extra)| Case {
                num_leaves: n,
                merges,
                lengths,
                in_data,
                num_extra,
            })
    })
}

fn label(i: usize) -> String {
    format!("T{i}")
}

fn build_tree(case: &Case) -> PhyloTree {
    let mut lengths = case.lengths.iter().map(|&l| Some(BranchLength::new(l)));
    let mut tree = PhyloTree::new(case.num_leaves);
    let mut pool: Vec<VertexIndex> = (0..case.num_leaves)
        .map(|i| tree.add_leaf(lengths.next().flatten(), label(i)))
        .collect();

    for (first, second) in &case.merges {
        let a = pool.swap_remove(first.index(pool.len()));
        let b = pool.swap_remove(second.index(pool.len()));
        if pool.is_empty() {
            tree.add_root_without_branch(vec![a, b]);
        } else {
            pool.push(tree.add_internal_vertex(vec![a, b], lengths.next().flatten()));
        }
    }
    tree
}

/// Kept taxa in reverse order plus extra keys, so rows never start in tree order.
fn data_keys(case: &Case) -> (BTreeSet<String>, Vec<String>) {
    let mut kept: BTreeSet<String> = case
        .in_data
        .iter()
        .enumerate()
        .filter(|&(_, &keep)| keep)
        .map(|(i, _)| label(i))
        .collect();
    if kept.is_empty() {
        kept.insert(label(0));
    }
    let mut keys: Vec<String> = kept.iter().rev().cloned().collect();
    keys.extend((0..case.num_extra).map(|i| format!("X{i}")));
    (kept, keys)
}

proptest! {
    #[test]
    fn prop_reconciled_pair_is_aligned(case in arb_case()) {
        let tree = build_tree(&case);
        prop_assert!(tree.validate().is_ok());
        let (kept, keys) = data_keys(&case);
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let data = dataset_for(&key_refs);

        let (report, pair) = reconcile(&tree, &data, "species").unwrap();

        // Same taxa, same order
        let labels = pair.tree.leaf_labels();
        prop_assert_eq!(&labels, &pair.dataset.keys().unwrap());
        let label_set: BTreeSet<String> = labels.iter().map(|s| s.to_string()).collect();
        prop_assert_eq!(&label_set, &kept);

        // Report is exactly the symmetric difference
        prop_assert_eq!(report.tree_not_data.len(), case.num_leaves - kept.len());
        let extras: BTreeSet<String> = (0..case.num_extra).map(|i| format!("X{i}")).collect();
        prop_assert_eq!(&report.data_not_tree, &extras);
        let dropped: BTreeSet<String> = (0..case.num_leaves)
            .map(label)
            .filter(|l| !kept.contains(l))
            .collect();
        prop_assert_eq!(&report.tree_not_data, &dropped);

        prop_assert!(pair.tree.validate().is_ok());
        prop_assert!(check_tree(&pair.tree).is_binary);
    }

    #[test]
    fn prop_pruning_preserves_distances(case in arb_case()) {
        let tree = build_tree(&case);
        let (_, keys) = data_keys(&case);
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let (_, pair) = reconcile(&tree, &dataset_for(&key_refs), "species").unwrap();

        let before: HashMap<&str, f64> = tree.root_to_tip_distances().unwrap().into_iter().collect();
        for (label, depth) in pair.tree.root_to_tip_distances().unwrap() {
            let expected = before[label];
            prop_assert!((depth - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }

    #[test]
    fn prop_reconcile_is_idempotent(case in arb_case()) {
        let tree = build_tree(&case);
        let (_, keys) = data_keys(&case);
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let (_, first) = reconcile(&tree, &dataset_for(&key_refs), "species").unwrap();
        let (report, second) = reconcile(&first.tree, &first.dataset, "species").unwrap();

        prop_assert!(report.is_empty());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_subset_partitions_rows(mask in vec(any::<bool>(), 1..40)) {
        let mut data = dataset_for(&[]);
        for (i, &present) in mask.iter().enumerate() {
            let mass = present.then_some(tipmatch::model::CellValue::Float(i as f64));
            data.push_row(vec![Some(label(i).into()), mass, None]).unwrap();
        }

        let result = subset_complete(&data, &["mass"]).unwrap();
        prop_assert_eq!(result.dataset.num_rows() + result.rows_dropped(), data.num_rows());
        prop_assert_eq!(result.rows_dropped(), mask.iter().filter(|&&p| !p).count());
        for position in 0..result.dataset.num_rows() {
            prop_assert!(result.dataset.get(position, "mass").unwrap().is_some());
        }
    }
}
