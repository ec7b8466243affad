//! Read-only tree diagnostics and the explicit ultrametric repair.

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Result};
use crate::model::{BranchLength, PhyloTree};
use serde::Serialize;
use tracing::debug;

/// Result of [check_tree]: three flags plus the numbers behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeHealth {
    /// No vertex has more than two children and no inner vertex has only one
    pub is_binary: bool,
    /// Exactly one root, which is not a basal polytomy without stem
    pub is_rooted: bool,
    /// All root-to-tip distances equal within tolerance
    pub is_ultrametric: bool,
    /// Number of leaves
    pub num_leaves: usize,
    /// Whether every non-root vertex has a branch length
    pub has_branch_lengths: bool,
    /// Largest minus smallest root-to-tip distance, if there are leaves with
    /// branch lengths
    pub max_depth_spread: Option<f64>,
}

/// Checks a tree with default tolerances; see [check_tree_with].
pub fn check_tree(tree: &PhyloTree) -> TreeHealth {
    check_tree_with(tree, &ReconcileConfig::default())
}

/// Reports whether a tree is binary, rooted and ultrametric.
///
/// Never fails: a structurally broken tree simply reports `false` flags.
/// Deciding whether to go on with a flagged tree is up to the caller.
///
/// # Example
/// ```
/// use tipmatch::model::{BranchLength, PhyloTree};
/// use tipmatch::reconcile::check_tree;
///
/// let mut tree = PhyloTree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(1.0)), "B");
/// let c = tree.add_leaf(Some(BranchLength::new(1.0)), "C");
/// tree.add_root_without_branch(vec![a, b, c]);
///
/// let health = check_tree(&tree);
/// assert!(!health.is_binary);
/// assert!(health.is_ultrametric);
/// ```
pub fn check_tree_with(tree: &PhyloTree, config: &ReconcileConfig) -> TreeHealth {
    let topology_ok = tree.validate_topology().is_ok();
    let num_leaves = tree.vertices().iter().filter(|v| v.is_leaf()).count();
    let has_branch_lengths = tree.vertices_have_branch_lengths();

    if !topology_ok {
        debug!("check_tree: topology invalid, reporting all flags false");
        return TreeHealth {
            is_binary: false,
            is_rooted: false,
            is_ultrametric: false,
            num_leaves,
            has_branch_lengths,
            max_depth_spread: None,
        };
    }

    let is_binary = tree
        .vertices()
        .iter()
        .all(|v| v.is_leaf() || v.num_children() == 2);

    let root = tree.root();
    let is_rooted = root.num_children() <= 2 || root.branch_length().is_some();

    let max_depth_spread = tree.root_to_tip_distances().and_then(|distances| {
        let depths = distances.iter().map(|&(_, d)| d);
        let min = depths.clone().reduce(f64::min)?;
        let max = depths.reduce(f64::max)?;
        Some(max - min)
    });
    let is_ultrametric =
        tree.is_ultrametric_within(config.relative_tolerance, config.absolute_tolerance);

    TreeHealth {
        is_binary,
        is_rooted,
        is_ultrametric,
        num_leaves,
        has_branch_lengths,
        max_depth_spread,
    }
}

/// Target depth for [coerce_ultrametric].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTarget {
    /// Extend every leaf to the deepest root-to-tip distance
    Max,
    /// Move every leaf to the mean root-to-tip distance
    Mean,
}

/// Makes a tree ultrametric by adjusting terminal branches only.
///
/// Each leaf's terminal branch changes by `target - depth(leaf)`, so all
/// root-to-tip distances become the target depth.
/// Only valid for trees *known* to be ultrametric whose branch lengths lost
/// precision. For a tree with extinct tips the adjustment silently changes
/// the data; nothing in this crate applies it implicitly.
///
/// # Errors
/// * [ReconcileError::MissingBranchLengths] if a branch length is absent
/// * [ReconcileError::UltrametricCoercion] if a terminal branch would become
///   negative (possible with [DepthTarget::Mean]); no tree is returned then
/// * [ReconcileError::StructuralTree] for a broken tree
pub fn coerce_ultrametric(tree: &PhyloTree, target: DepthTarget) -> Result<PhyloTree> {
    tree.validate_topology()?;
    let distances = tree
        .root_to_tip_distances()
        .ok_or(ReconcileError::MissingBranchLengths)?;

    let depths: Vec<f64> = distances.iter().map(|&(_, d)| d).collect();
    let target_depth = match target {
        DepthTarget::Max => depths.iter().copied().fold(f64::MIN, f64::max),
        DepthTarget::Mean => depths.iter().sum::<f64>() / depths.len() as f64,
    };

    let mut adjusted = tree.clone();
    let leaves: Vec<usize> = tree.leaves().map(|v| v.index()).collect();
    for (index, (label, depth)) in leaves.into_iter().zip(distances) {
        let current = tree[index].branch_length().map_or(0.0, |bl| *bl);
        let new_length = current + (target_depth - depth);
        // Rounding noise around zero is not a negative branch
        let new_length = if new_length < 0.0 && new_length > -f64::EPSILON * target_depth.abs() {
            0.0
        } else {
            new_length
        };
        if new_length < 0.0 {
            return Err(ReconcileError::UltrametricCoercion {
                leaf: label.to_string(),
                adjusted_length: new_length,
            });
        }
        adjusted[index].set_branch_length(Some(BranchLength::try_new(new_length)?));
    }

    debug!(?target, target_depth, "coerced tree to ultrametric");
    Ok(adjusted)
}
