//! Matching a tree against a dataset: mismatch report, pruning, reordering.

use crate::error::{KeyOrigin, ReconcileError, Result};
use crate::model::{BranchLength, Dataset, PhyloTree, VertexIndex};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

// =#========================================================================#=
// MISMATCH REPORT
// =#========================================================================#=
/// Taxa present on only one side of a reconciliation.
///
/// Always produced, also when both sets are empty. A non-empty report is
/// not an error; it is meant to be looked at by a human, since a typo in a
/// species name shows up here as one entry on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    /// Leaf labels without a dataset row
    pub tree_not_data: BTreeSet<String>,
    /// Dataset keys without a leaf
    pub data_not_tree: BTreeSet<String>,
}

impl MismatchReport {
    /// Returns `true` if tree and dataset covered the same taxa.
    pub fn is_empty(&self) -> bool {
        self.tree_not_data.is_empty() && self.data_not_tree.is_empty()
    }
}

// =#========================================================================#=
// RECONCILED PAIR
// =#========================================================================#=
/// A tree and a dataset with identical taxa, row `i` belonging to the
/// `i`-th leaf of [PhyloTree::leaf_labels].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledPair {
    /// Pruned tree
    pub tree: PhyloTree,
    /// Filtered and reordered dataset
    pub dataset: Dataset,
}

impl ReconciledPair {
    /// Returns the number of taxa.
    pub fn num_taxa(&self) -> usize {
        self.dataset.num_rows()
    }
}

// =#========================================================================#=
// RECONCILE
// =#========================================================================#=
/// Prunes the tree and filters and reorders the dataset so that both cover
/// exactly the same taxa in the same order.
///
/// Keys match leaf labels exactly and case-sensitively. Neither input is
/// modified.
///
/// # Arguments
/// * `tree` - Tree whose leaf labels identify taxa
/// * `dataset` - Table with one row per taxon
/// * `key_column` - Column of `dataset` holding the identifiers
///
/// # Returns
/// The [MismatchReport] of taxa found on one side only, and the
/// [ReconciledPair].
///
/// # Errors
/// * [ReconcileError::UnknownColumn] if `key_column` does not exist
/// * [ReconcileError::MissingKey] if a row has no textual key
/// * [ReconcileError::StructuralTree] if the tree is not a single rooted tree
/// * [ReconcileError::DuplicateKey] for duplicated keys or leaf labels,
///   checked before anything is pruned
/// * [ReconcileError::EmptyIntersection] if no taxon is shared
///
/// # Example
/// ```
/// use tipmatch::model::{BranchLength, CellValue, Dataset, PhyloTree};
/// use tipmatch::reconcile::reconcile;
///
/// let mut tree = PhyloTree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(1.0)), "B");
/// let c = tree.add_leaf(Some(BranchLength::new(2.0)), "C");
/// let ab = tree.add_internal_vertex(vec![a, b], Some(BranchLength::new(1.0)));
/// tree.add_root_without_branch(vec![ab, c]);
///
/// let mut data = Dataset::new(vec!["species".into(), "mass".into()], "species").unwrap();
/// for (key, mass) in [("C", 3.0), ("A", 1.0), ("X", 9.0)] {
///     data.push_row(vec![Some(key.into()), Some(CellValue::Float(mass))]).unwrap();
/// }
///
/// let (report, pair) = reconcile(&tree, &data, "species").unwrap();
/// assert!(report.tree_not_data.contains("B"));
/// assert!(report.data_not_tree.contains("X"));
/// assert_eq!(pair.tree.leaf_labels(), vec!["A", "C"]);
/// assert_eq!(pair.dataset.keys().unwrap(), vec!["A", "C"]);
/// ```
pub fn reconcile(
    tree: &PhyloTree,
    dataset: &Dataset,
    key_column: &str,
) -> Result<(MismatchReport, ReconciledPair)> {
    let dataset = dataset.clone().with_key_column(key_column)?;
    let keys = dataset.keys()?;
    tree.validate_topology()?;

    // Duplicates first, before anything gets pruned
    let duplicate_keys = dataset.duplicate_keys()?;
    if !duplicate_keys.is_empty() {
        return Err(ReconcileError::DuplicateKey {
            origin: KeyOrigin::Dataset,
            keys: duplicate_keys,
            count: dataset.num_rows(),
        });
    }
    let duplicate_labels = tree.duplicate_labels();
    if !duplicate_labels.is_empty() {
        return Err(ReconcileError::DuplicateKey {
            origin: KeyOrigin::Tree,
            keys: duplicate_labels,
            count: tree.num_leaves(),
        });
    }

    let leaf_set = tree.leaf_label_set();
    let key_set: HashSet<&str> = keys.iter().copied().collect();

    let report = MismatchReport {
        tree_not_data: leaf_set
            .difference(&key_set)
            .map(|s| s.to_string())
            .collect(),
        data_not_tree: key_set
            .difference(&leaf_set)
            .map(|s| s.to_string())
            .collect(),
    };

    if leaf_set.intersection(&key_set).next().is_none() {
        return Err(ReconcileError::EmptyIntersection {
            num_leaves: leaf_set.len(),
            num_rows: dataset.num_rows(),
        });
    }

    if !report.is_empty() {
        warn!(
            tree_not_data = report.tree_not_data.len(),
            data_not_tree = report.data_not_tree.len(),
            "tree and dataset disagree on taxa; review the mismatch report"
        );
    }

    let pruned = if report.tree_not_data.is_empty() {
        tree.clone()
    } else {
        prune_leaves(tree, &report.tree_not_data)?
    };

    // Filtering and reordering in one go: select rows in tree order
    let order = pruned.leaf_labels();
    let reordered = dataset.select_rows(&order)?;

    debug!(
        num_taxa = reordered.num_rows(),
        dropped_leaves = report.tree_not_data.len(),
        dropped_rows = report.data_not_tree.len(),
        "reconciled tree and dataset"
    );

    Ok((
        report,
        ReconciledPair {
            tree: pruned,
            dataset: reordered,
        },
    ))
}

// =#========================================================================#=
// PRUNING
// =#========================================================================#=
/// Returns a copy of the tree without the leaves with the given labels.
///
/// A vertex left with a single child is collapsed: its branch length is
/// added to the child's, so root-to-tip distances of surviving leaves stay
/// the same. If either length is missing, the joined length is missing
/// too. If the root collapses, its surviving child becomes the root and the
/// collapsed lengths become the new root's stem. Labels not in the tree are
/// ignored.
///
/// # Errors
/// * [ReconcileError::EmptyIntersection] if no leaf would remain
/// * [ReconcileError::StructuralTree] if the tree is not a single rooted tree
pub fn prune_leaves<I>(tree: &PhyloTree, labels: I) -> Result<PhyloTree>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tree.validate_topology()?;
    let drop: HashSet<String> = labels.into_iter().map(|s| s.as_ref().to_string()).collect();

    let mut pruned = PhyloTree::new(tree.num_leaves().saturating_sub(drop.len()));
    if let Some(name) = tree.name() {
        pruned.set_name(name.clone());
    }

    // Rebuild bottom-up; for each old vertex the new vertex standing in for it
    let mut replacement: Vec<Option<VertexIndex>> = vec![None; tree.num_vertices()];
    for vertex in tree.post_order_iter() {
        let index = vertex.index();
        if let Some(label) = vertex.label() {
            if !drop.contains(label) {
                replacement[index] = Some(pruned.add_leaf(vertex.branch_length(), label));
            }
            continue;
        }

        let kept: Vec<VertexIndex> = vertex
            .children()
            .iter()
            .filter_map(|&child| replacement[child])
            .collect();

        replacement[index] = match kept.len() {
            0 => None,
            1 => {
                let child = kept[0];
                // A root without stem adds nothing; elsewhere a missing length is unknown
                let own = match vertex.branch_length() {
                    None if vertex.is_root() => Some(BranchLength::new(0.0)),
                    own => own,
                };
                let joined = BranchLength::join(pruned[child].branch_length(), own);
                pruned[child].set_branch_length(joined);
                Some(child)
            }
            _ if vertex.is_root() => Some(pruned.add_root(kept, vertex.branch_length())),
            _ => Some(pruned.add_internal_vertex(kept, vertex.branch_length())),
        };
    }

    let Some(new_root) = replacement[tree.root_index()] else {
        return Err(ReconcileError::EmptyIntersection {
            num_leaves: tree.num_leaves(),
            num_rows: 0,
        });
    };
    if !pruned[new_root].is_root() {
        pruned.promote_to_root(new_root);
    }

    debug!(
        before = tree.num_leaves(),
        after = pruned.num_leaves(),
        "pruned tree"
    );
    Ok(pruned)
}
