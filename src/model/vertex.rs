//! Vertex module for phylogenetic tree representation.

use crate::error::{ReconcileError, Result};
use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
/// A leaf that is the root of a single-leaf tree keeps it unset.
pub(crate) const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children, no parent, might have a stem branch_length
/// - **Internal**: Has parent and children, no label, might have branch_length
/// - **Leaf**: Has no children, has label and might have branch_length
///
/// Unlike a strictly binary model, any vertex may have an arbitrary number
/// of children, so polytomies and unary vertices are representable and can
/// be diagnosed instead of rejected at construction.
///
/// # Invariants
/// - `index` is index in arena
/// - `branch_length` is non-negative and finite (enforced by [BranchLength])
/// - Internal vertices and Leaf have `parent` set to index of parent in arena;
///   `NO_PARENT_SET = usize::MAX` during construction and for a leaf that is
///   itself the root of a single-leaf tree
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree (has no parent, has children)
    Root {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Indices of the child vertices, in left-to-right order
        children: Vec<VertexIndex>,
        /// Stem length above the root (optional, rare)
        branch_length: Option<BranchLength>,
    },
    /// Internal vertex (has parent and children, no label)
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Indices of the child vertices, in left-to-right order
        children: Vec<VertexIndex>,
        /// Distance to parent vertex
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex (has parent and label, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Distance to parent vertex
        branch_length: Option<BranchLength>,
        /// Taxon label of this leaf
        label: String,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    pub fn new_root(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Root {
            index,
            children,
            branch_length,
        }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            branch_length,
        }
    }

    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `branch_length` - Distance to parent vertex
    /// * `label` - Taxon label of this leaf
    pub fn new_leaf(index: VertexIndex, branch_length: Option<BranchLength>, label: String) -> Self {
        Vertex::Leaf {
            index,
            parent: NO_PARENT_SET,
            branch_length,
            label,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. } => *index,
            Vertex::Internal { index, .. } => *index,
            Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    ///
    /// The root counts as having one, since a stem is optional.
    pub fn has_branch_length(&self) -> bool {
        match self {
            Vertex::Root { .. } => true,
            Vertex::Internal { branch_length, .. } => branch_length.is_some(),
            Vertex::Leaf { branch_length, .. } => branch_length.is_some(),
        }
    }

    /// Returns the branch length of this vertex, for a root its stem length.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Replaces the branch length of this vertex.
    pub fn set_branch_length(&mut self, length: Option<BranchLength>) {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length = length,
        }
    }

    /// Returns label if this is a leaf, else `None`.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Leaf { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children, empty for a leaf.
    pub fn children(&self) -> &[VertexIndex] {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children().len()
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: VertexIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } => *p = parent,
            Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex, else `None`.
    ///
    /// Note that parent might not be set yet during construction.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                if *parent == NO_PARENT_SET {
                    None
                } else {
                    Some(*parent)
                }
            }
            Vertex::Root { .. } => None,
        }
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Turns a parentless internal vertex into a root, keeping index,
    /// children and branch length (which becomes the stem).
    /// Leaves and roots are returned unchanged.
    pub(crate) fn into_root(self) -> Self {
        match self {
            Vertex::Internal {
                index,
                children,
                branch_length,
                ..
            } => Vertex::Root {
                index,
                children,
                branch_length,
            },
            Vertex::Leaf {
                index,
                branch_length,
                label,
                ..
            } => Vertex::Leaf {
                index,
                parent: NO_PARENT_SET,
                branch_length,
                label,
            },
            root @ Vertex::Root { .. } => root,
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    /// Use [BranchLength::try_new] for untrusted input.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, failing with
    /// [ReconcileError::InvalidBranchLength] if `length` is negative,
    /// NaN or infinite.
    pub fn try_new(length: f64) -> Result<Self> {
        if length >= 0.0 && length.is_finite() {
            Ok(BranchLength(length))
        } else {
            Err(ReconcileError::InvalidBranchLength { value: length })
        }
    }

    /// Sum of two consecutive branch lengths; `None` if either is unknown.
    pub(crate) fn join(a: Option<BranchLength>, b: Option<BranchLength>) -> Option<BranchLength> {
        Some(BranchLength(a?.0 + b?.0))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for BranchLength {
    type Error = ReconcileError;

    fn try_from(value: f64) -> Result<Self> {
        BranchLength::try_new(value)
    }
}
