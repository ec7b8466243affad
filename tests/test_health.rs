mod common;

use common::{assert_close, build, four_taxon_tree, leaf, node};
use tipmatch::check_tree;
use tipmatch::config::ReconcileConfig;
use tipmatch::error::ReconcileError;
use tipmatch::model::{BranchLength, PhyloTree};
use tipmatch::reconcile::{DepthTarget, check_tree_with, coerce_ultrametric};

#[test]
fn test_healthy_tree() {
    let health = check_tree(&four_taxon_tree());
    assert!(health.is_binary);
    assert!(health.is_rooted);
    assert!(health.is_ultrametric);
    assert!(health.has_branch_lengths);
    assert_eq!(health.num_leaves, 4);
    assert_close(health.max_depth_spread.unwrap(), 0.0);
}

#[test]
fn test_polytomy_is_not_binary() {
    let tree = build(vec![
        node(vec![leaf("A", 1.0), leaf("B", 1.0), leaf("C", 1.0)], 1.0),
        leaf("D", 2.0),
    ]);
    let health = check_tree(&tree);
    assert!(!health.is_binary);
    assert!(health.is_rooted);
    assert!(health.is_ultrametric);
}

#[test]
fn test_basal_trichotomy_is_unrooted() {
    let tree = build(vec![leaf("A", 1.0), leaf("B", 1.0), leaf("C", 1.0)]);
    let health = check_tree(&tree);
    assert!(!health.is_binary);
    assert!(!health.is_rooted);
}

#[test]
fn test_unary_vertex_is_not_binary() {
    let tree = build(vec![node(vec![leaf("A", 1.0)], 1.0), leaf("B", 2.0)]);
    assert!(!check_tree(&tree).is_binary);
}

#[test]
fn test_rounding_noise_is_ultrametric() {
    let tree = build(vec![
        node(vec![leaf("A", 1.0), leaf("B", 1.0 + 1e-10)], 1.0),
        leaf("C", 2.0),
    ]);
    assert!(check_tree(&tree).is_ultrametric);
}

#[test]
fn test_real_difference_is_not_ultrametric() {
    let tree = build(vec![
        node(vec![leaf("A", 1.0), leaf("B", 1.001)], 1.0),
        leaf("C", 2.0),
    ]);
    let health = check_tree(&tree);
    assert!(!health.is_ultrametric);
    assert!((health.max_depth_spread.unwrap() - 1e-3).abs() < 1e-9);

    // Accepted with a looser tolerance
    let loose = ReconcileConfig::default().with_relative_tolerance(1e-2);
    assert!(check_tree_with(&tree, &loose).is_ultrametric);
}

#[test]
fn test_missing_branch_lengths_not_ultrametric() {
    let mut tree = PhyloTree::new(2);
    let a = tree.add_leaf(None, "A");
    let b = tree.add_leaf(None, "B");
    tree.add_root_without_branch(vec![a, b]);

    let health = check_tree(&tree);
    assert!(health.is_binary);
    assert!(!health.is_ultrametric);
    assert!(!health.has_branch_lengths);
    assert_eq!(health.max_depth_spread, None);
}

#[test]
fn test_broken_tree_reports_false_flags() {
    let mut tree = PhyloTree::new(2);
    tree.add_leaf(None, "A");
    tree.add_leaf(None, "B");

    let health = check_tree(&tree);
    assert!(!health.is_binary);
    assert!(!health.is_rooted);
    assert!(!health.is_ultrametric);
    assert_eq!(health.num_leaves, 2);
}

#[test]
fn test_check_tree_does_not_modify() {
    let tree = build(vec![node(vec![leaf("A", 1.0), leaf("B", 1.3)], 1.0), leaf("C", 2.0)]);
    let copy = tree.clone();
    check_tree(&tree);
    assert_eq!(tree, copy);
}

#[test]
fn test_coerce_to_max_depth() {
    let tree = build(vec![
        node(vec![leaf("A", 1.0), leaf("B", 1.2)], 1.0),
        leaf("C", 2.0),
    ]);
    assert!(!check_tree(&tree).is_ultrametric);

    let coerced = coerce_ultrametric(&tree, DepthTarget::Max).unwrap();
    assert!(check_tree(&coerced).is_ultrametric);
    assert_close(coerced.height().unwrap(), 2.2);
    // Only terminal branches change
    assert_eq!(coerced.num_vertices(), tree.num_vertices());
    let a = coerced.find_leaf("A").unwrap();
    assert_close(*coerced[a].branch_length().unwrap(), 1.2);
    let parent = coerced[a].parent().unwrap();
    assert_eq!(coerced[parent].branch_length(), Some(BranchLength::new(1.0)));
}

#[test]
fn test_coerce_to_mean_depth() {
    let tree = build(vec![leaf("A", 1.0), leaf("B", 1.2)]);
    let coerced = coerce_ultrametric(&tree, DepthTarget::Mean).unwrap();
    for (_, depth) in coerced.root_to_tip_distances().unwrap() {
        assert_close(depth, 1.1);
    }
}

#[test]
fn test_coerce_rejects_negative_branch() {
    let tree = build(vec![
        node(vec![leaf("A", 0.1), leaf("B", 0.1)], 2.0),
        leaf("C", 0.2),
    ]);
    match coerce_ultrametric(&tree, DepthTarget::Mean) {
        Err(ReconcileError::UltrametricCoercion { leaf, adjusted_length }) => {
            assert_eq!(leaf, "A");
            assert!(adjusted_length < 0.0);
        }
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn test_coerce_needs_branch_lengths() {
    let mut tree = PhyloTree::new(2);
    let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
    let b = tree.add_leaf(None, "B");
    tree.add_root_without_branch(vec![a, b]);

    assert!(matches!(
        coerce_ultrametric(&tree, DepthTarget::Max),
        Err(ReconcileError::MissingBranchLengths)
    ));
}

#[test]
fn test_tree_without_leaves() {
    let mut tree = PhyloTree::new(0);
    tree.add_root(Vec::new(), Some(BranchLength::new(1.0)));

    let health = check_tree(&tree);
    assert_eq!(health.num_leaves, 0);
    assert!(!health.is_ultrametric);
    assert_eq!(health.max_depth_spread, None);
    assert_eq!(tree.height(), None);
}
