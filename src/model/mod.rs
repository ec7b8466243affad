//! Data model for phylogenetic trees and trait datasets.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Vertices may have any number of children,
//! so polytomies can be detected rather than rejected.
//!
//! # Building trees
//! Trees are constructed bottom-up, either directly via
//! [`PhyloTree::add_leaf`] and friends, or through the [TreeBuilder] trait,
//! which lets any external Newick/NEXUS parser produce a [PhyloTree]
//! (see [PhyloTreeBuilder]).
//!
//! # Datasets
//! A [Dataset] is a table with a designated key column; cells are optional
//! [CellValue]s.

pub mod dataset;
pub mod tree;
pub mod tree_builder;
pub mod vertex;

// Tree
pub use tree::PhyloTree;
pub use tree::VertexIndex;
pub use tree_builder::{PhyloTreeBuilder, TreeBuilder};
pub use vertex::{BranchLength, Vertex};
// Dataset
pub use dataset::{CellValue, Dataset, Row};
