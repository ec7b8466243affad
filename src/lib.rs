//! Tipmatch reconciles a phylogenetic tree with a table of trait data
//! before comparative analyses.
//!
//! Comparative methods (phylogenetic regression, ancestral state
//! reconstruction, model fits) silently go wrong when tree and data are
//! misaligned: a species present only on one side, a typo in a label, rows
//! in a different order than the leaves. This crate makes that alignment an
//! explicit step with a report a human can read.
//! Core functionality provided:
//! - Tree health: [check_tree] reports whether a tree is binary, rooted and
//!   ultrametric (within tolerance); an explicit
//!   [coerce_ultrametric](reconcile::coerce_ultrametric) fixes rounding noise.
//! - Reconcile: [reconcile] prunes leaves without data, drops rows without
//!   leaves, and orders rows like the leaves, returning a
//!   [MismatchReport](reconcile::MismatchReport) alongside.
//! - Complete cases: [subset_complete] keeps the rows with values in all
//!   required columns and reports the dropped ones.
//! - Models: [PhyloTree] (arena pattern, any number of children per vertex)
//!   and [Dataset]; trees come from any parser through the
//!   [TreeBuilder](model::TreeBuilder) trait.
//! - I/O: datasets as comma-separated text ([io]), trees as Newick
//!   ([newick]), results as text or JSON ([artifact]).
//! - External analyses: long fits run through [external] with cancellation
//!   and a deadline.
//!
//! Limitations:
//! - No Newick/NEXUS parsing; plug a parser into a
//!   [TreeBuilder](model::TreeBuilder)
//! - Exact, case-sensitive matching of keys and labels
//! - No statistics; [external] is only the boundary to them
//!
//! # Example
//! ```
//! use tipmatch::model::{CellValue, Dataset, PhyloTreeBuilder, TreeBuilder};
//! use tipmatch::{check_tree, reconcile, subset_complete};
//!
//! // ((Kea:1,Kaka:1):1,Kakapo:2);
//! let mut builder = PhyloTreeBuilder::new();
//! builder.init_next(3);
//! let kea = builder.add_leaf(Some(1.0), "Kea".to_string());
//! let kaka = builder.add_leaf(Some(1.0), "Kaka".to_string());
//! let kakapo = builder.add_leaf(Some(2.0), "Kakapo".to_string());
//! let nestor = builder.add_internal(vec![kea, kaka], Some(1.0));
//! builder.add_root(vec![nestor, kakapo], None);
//! let tree = builder.finish_tree().unwrap();
//! assert!(check_tree(&tree).is_ultrametric);
//!
//! let mut data = Dataset::new(vec!["species".into(), "mass".into()], "species").unwrap();
//! data.push_row(vec![Some("Kakapo".into()), Some(CellValue::Float(2.2))]).unwrap();
//! data.push_row(vec![Some("Kea".into()), None]).unwrap();
//! data.push_row(vec![Some("Kaka".into()), Some(CellValue::Float(0.45))]).unwrap();
//!
//! let (report, pair) = reconcile(&tree, &data, "species").unwrap();
//! assert!(report.is_empty());
//! assert_eq!(pair.dataset.keys().unwrap(), vec!["Kea", "Kaka", "Kakapo"]);
//!
//! let complete = subset_complete(&pair.dataset, &["mass"]).unwrap();
//! assert_eq!(complete.dropped_keys, vec!["Kea"]);
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod external;
pub mod io;
pub mod model;
pub mod newick;
pub mod reconcile;

pub use crate::error::{ReconcileError, Result};
pub use crate::model::{Dataset, PhyloTree};

use crate::reconcile::{CompleteCases, MismatchReport, ReconciledPair, TreeHealth};

// ============================================================================
// Quick API
// ============================================================================
/// Reports whether a tree is binary, rooted and ultrametric,
/// using default tolerances.
///
/// See [`reconcile::check_tree_with`] for custom tolerances.
pub fn check_tree(tree: &PhyloTree) -> TreeHealth {
    reconcile::check_tree(tree)
}

/// Prunes the tree and filters and reorders the dataset to the taxa both
/// share.
///
/// See [`reconcile::reconcile`] for full documentation.
pub fn reconcile(
    tree: &PhyloTree,
    dataset: &Dataset,
    key_column: &str,
) -> Result<(MismatchReport, ReconciledPair)> {
    reconcile::reconcile(tree, dataset, key_column)
}

/// Keeps only rows with values in all required columns.
///
/// See [`reconcile::subset_complete`] for full documentation.
pub fn subset_complete<S: AsRef<str>>(
    dataset: &Dataset,
    required_columns: &[S],
) -> Result<CompleteCases> {
    reconcile::subset_complete(dataset, required_columns)
}
