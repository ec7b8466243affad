//! Error types for tree validation, reconciliation and I/O.
//!
//! Conditions that are expected in everyday data, like a tree and a table
//! covering different species or rows with missing measurements, are never
//! errors. They are returned as reports
//! ([MismatchReport](crate::reconcile::MismatchReport),
//! [CompleteCases](crate::reconcile::CompleteCases)).

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Convenience result type of this crate.
pub type Result<T> = std::result::Result<T, ReconcileError>;

// =#========================================================================#=
// RECONCILE ERROR
// =#========================================================================#=
/// Errors that can occur while checking, reconciling or subsetting
/// trees and datasets.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Tree is not a single connected rooted tree, or has duplicate labels
    #[error("Invalid tree structure: {0}")]
    StructuralTree(#[from] StructuralTreeError),

    /// Tree and dataset share no taxon at all
    #[error("Tree and dataset share no taxa ({num_leaves} leaves, {num_rows} rows)")]
    EmptyIntersection {
        /// Number of leaves in the tree
        num_leaves: usize,
        /// Number of rows in the dataset
        num_rows: usize,
    },

    /// Keys that occur more than once, making the row-to-leaf mapping ambiguous
    #[error("Duplicate {origin} keys ({count} entries in total): {}", keys.join(", "))]
    DuplicateKey {
        /// Whether the duplicates are tree labels or dataset keys
        origin: KeyOrigin,
        /// Sorted duplicated keys
        keys: Vec<String>,
        /// Number of leaves or rows inspected
        count: usize,
    },

    /// Referenced column does not exist
    #[error("Unknown column '{column}' (available: {})", available.join(", "))]
    UnknownColumn {
        /// Requested column name
        column: String,
        /// Column names of the dataset
        available: Vec<String>,
    },

    /// Key cell missing or not textual
    #[error("Row {row} has no textual key")]
    MissingKey {
        /// 0-based row position
        row: usize,
    },

    /// Row does not match the number of columns
    #[error("Row has {found} cells, expected {expected}")]
    RowWidth {
        /// Number of columns of the dataset
        expected: usize,
        /// Number of cells in the rejected row
        found: usize,
    },

    /// Branch length negative, NaN or infinite
    #[error("Invalid branch length {value}")]
    InvalidBranchLength {
        /// The rejected value
        value: f64,
    },

    /// Operation needs branch lengths on all non-root vertices
    #[error("Tree lacks branch lengths on some vertices")]
    MissingBranchLengths,

    /// Ultrametric coercion would produce a negative terminal branch
    #[error(
        "Cannot coerce tree to ultrametric: leaf '{leaf}' would get branch length {adjusted_length}"
    )]
    UltrametricCoercion {
        /// Leaf whose terminal branch would become negative
        leaf: String,
        /// The negative length it would get
        adjusted_length: f64,
    },

    /// Tree builder used out of order
    #[error("Tree builder: {0}")]
    Builder(String),

    /// Reading or writing delimited text failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing cells cannot be written without a missing-value sentinel
    #[error("Cannot write missing cells: no missing-value sentinel configured")]
    NoMissingSentinel,

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// External analysis was cancelled through its token
    #[error("Analysis cancelled")]
    Cancelled,

    /// External analysis exceeded its deadline
    #[error("Analysis '{name}' timed out after {after:?}")]
    TimedOut {
        /// Name of the analysis
        name: String,
        /// Deadline that was exceeded
        after: Duration,
    },

    /// External analysis failed
    #[error("Analysis failed: {0}")]
    Analysis(String),
}

/// Where duplicated keys were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Leaf labels of the tree
    Tree,
    /// Key column of the dataset
    Dataset,
}

impl fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrigin::Tree => write!(f, "tree leaf"),
            KeyOrigin::Dataset => write!(f, "dataset"),
        }
    }
}

// =#========================================================================#=
// STRUCTURAL TREE ERROR
// =#========================================================================#=
/// Ways in which a [PhyloTree](crate::model::PhyloTree) can fail to be a
/// single rooted tree with unique leaf labels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralTreeError {
    /// Tree has no vertices
    #[error("tree is empty")]
    EmptyTree,

    /// Root index unset or not pointing to a root
    #[error("tree has no valid root")]
    NoRoot,

    /// More than one root vertex
    #[error("tree has {count} roots")]
    MultipleRoots {
        /// Number of root vertices
        count: usize,
    },

    /// Parent and child references disagree
    #[error("inconsistent parent/child links at vertex {vertex}")]
    BrokenLink {
        /// Vertex where the inconsistency was detected
        vertex: usize,
    },

    /// A vertex is reachable on more than one path
    #[error("cycle through vertex {vertex}")]
    Cycle {
        /// Vertex visited twice
        vertex: usize,
    },

    /// Vertices not connected to the root
    #[error("{count} vertices are not connected to the root")]
    Unreachable {
        /// Number of unreachable vertices
        count: usize,
    },

    /// Leaf labels occurring more than once
    #[error("duplicate leaf labels: {}", labels.join(", "))]
    DuplicateLabels {
        /// Sorted duplicated labels
        labels: Vec<String>,
    },
}
