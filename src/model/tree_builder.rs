//! Trait for constructing phylogenetic trees from external parsers.
//!
//! Reading Newick or NEXUS files is left to whichever parser the caller
//! prefers. The [`TreeBuilder`] trait decouples such parsers from the tree
//! representation: a parser calls builder methods as it reads the format,
//! and the builder assembles a [`PhyloTree`].
//!
//! # Builder lifecycle
//! A builder can construct multiple trees sequentially:
//!
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_*/set_name ──→ finish_tree() ──→ Empty
//!   ↑                                                                           │
//!   └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//! ```
//! use tipmatch::model::{PhyloTreeBuilder, TreeBuilder};
//!
//! let mut builder = PhyloTreeBuilder::new();
//! builder.init_next(3);
//! let a = builder.add_leaf(Some(1.0), "A".to_string());
//! let b = builder.add_leaf(Some(1.0), "B".to_string());
//! let c = builder.add_leaf(Some(2.0), "C".to_string());
//! let ab = builder.add_internal(vec![a, b], Some(1.0));
//! builder.add_root(vec![ab, c], None);
//! let tree = builder.finish_tree().unwrap();
//!
//! assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
//! ```

use crate::error::{ReconcileError, Result};
use crate::model::tree::{PhyloTree, VertexIndex};
use crate::model::vertex::BranchLength;

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees during parsing.
///
/// The parser drives the lifecycle:
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal),
///    [`add_root`](Self::add_root) -> build structure bottom-up
/// 3. [`set_name`](Self::set_name) -> optionally assign a name
/// 4. [`finish_tree`](Self::finish_tree) -> validate and return the tree
pub trait TreeBuilder {
    /// The type used to identify vertices during construction.
    type VertexIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of leaves (hint for allocation)
    fn init_next(&mut self, num_leaves: usize);

    /// Adds a leaf vertex to the tree under construction.
    ///
    /// # Arguments
    /// * `branch_len` - Branch length to parent, if specified
    /// * `label` - Taxon label, already unescaped by the parser
    fn add_leaf(&mut self, branch_len: Option<f64>, label: String) -> Self::VertexIdx;

    /// Adds an internal (non-root) vertex with the given children.
    fn add_internal(&mut self, children: Vec<Self::VertexIdx>, branch_len: Option<f64>) -> Self::VertexIdx;

    /// Adds the root vertex, completing the tree structure.
    ///
    /// # Arguments
    /// * `children` - Indices of the root's child vertices
    /// * `branch_len` - Root stem length (rare, but allowed in Newick)
    fn add_root(&mut self, children: Vec<Self::VertexIdx>, branch_len: Option<f64>) -> Self::VertexIdx;

    /// Sets the name of the currently constructed tree.
    fn set_name(&mut self, tree_name: String);

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Transitions builder back to the empty state, whether or not the
    /// tree was valid.
    fn finish_tree(&mut self) -> Result<Self::Tree>;
}

// =#========================================================================#=
// PHYLO TREE BUILDER
// =#========================================================================#=
/// Builder that constructs [PhyloTree] instances.
///
/// Invalid branch lengths do not abort construction immediately; the first
/// one is remembered and reported by [`finish_tree`](TreeBuilder::finish_tree),
/// which also runs [`PhyloTree::validate_topology`].
/// Duplicate leaf labels are accepted here, since reconciliation reports
/// them with more context.
#[derive(Debug, Default)]
pub struct PhyloTreeBuilder {
    current_tree: Option<PhyloTree>,
    first_error: Option<ReconcileError>,
}

impl PhyloTreeBuilder {
    /// Creates a new builder in the empty state.
    pub fn new() -> Self {
        Self::default()
    }

    fn branch_length(&mut self, value: Option<f64>) -> Option<BranchLength> {
        match value.map(BranchLength::try_new).transpose() {
            Ok(bl) => bl,
            Err(e) => {
                self.first_error.get_or_insert(e);
                None
            }
        }
    }

    fn tree(&mut self) -> &mut PhyloTree {
        self.current_tree.get_or_insert_with(|| PhyloTree::new(0))
    }

    /// Records an error for children not yet added to the tree, so the
    /// arena never gets indexed out of bounds.
    fn check_children(&mut self, children: &[VertexIndex]) -> bool {
        let tree = self.tree();
        let bad = children
            .iter()
            .copied()
            .find(|&c| c >= tree.num_vertices() || tree[c].has_parent() || tree[c].is_root());
        if let Some(child) = bad {
            self.first_error.get_or_insert(ReconcileError::Builder(format!(
                "child {child} unknown or already attached"
            )));
            false
        } else {
            true
        }
    }
}

impl TreeBuilder for PhyloTreeBuilder {
    type VertexIdx = VertexIndex;
    type Tree = PhyloTree;

    fn init_next(&mut self, num_leaves: usize) {
        self.current_tree = Some(PhyloTree::new(num_leaves));
        self.first_error = None;
    }

    fn add_leaf(&mut self, branch_len: Option<f64>, label: String) -> Self::VertexIdx {
        let branch_length = self.branch_length(branch_len);
        self.tree().add_leaf(branch_length, label)
    }

    fn add_internal(&mut self, children: Vec<Self::VertexIdx>, branch_len: Option<f64>) -> Self::VertexIdx {
        let branch_length = self.branch_length(branch_len);
        let children = if self.check_children(&children) { children } else { Vec::new() };
        self.tree().add_internal_vertex(children, branch_length)
    }

    fn add_root(&mut self, children: Vec<Self::VertexIdx>, branch_len: Option<f64>) -> Self::VertexIdx {
        let branch_length = self.branch_length(branch_len);
        let children = if self.check_children(&children) { children } else { Vec::new() };
        self.tree().add_root(children, branch_length)
    }

    fn set_name(&mut self, tree_name: String) {
        self.tree().set_name(tree_name);
    }

    fn finish_tree(&mut self) -> Result<Self::Tree> {
        let mut tree = self
            .current_tree
            .take()
            .ok_or_else(|| ReconcileError::Builder("init_next not called".to_string()))?;
        if let Some(e) = self.first_error.take() {
            return Err(e);
        }
        // A lone leaf is a complete tree
        if !tree.is_root_set() && tree.num_vertices() == 1 {
            tree.promote_to_root(0);
        }
        tree.validate_topology()?;
        Ok(tree)
    }
}
