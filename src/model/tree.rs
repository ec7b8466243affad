//! Provides the phylogenetic tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [PhyloTree] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * [PostOrderIter] and [PreOrderIter] for stack-based traversal

use crate::error::StructuralTreeError;
use crate::model::vertex::{BranchLength, Vertex};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern
/// on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
///   (e.g. leaves must not be first `n` indices)
/// - Children are ordered; the left-to-right leaf sequence is the
///   *canonical leaf ordering* (see [PhyloTree::leaf_labels]).
/// - Vertices may have any number of children, so polytomies can be
///   represented and diagnosed.
/// - Branch lengths are optional, but if provided must be non-negative.
/// - A single-leaf tree has a [Vertex::Leaf] as its root.
///
/// # Construction
/// Add vertices bottom-up: leaves first, then internal vertices referencing
/// their children, and finally the root. Test validity with
/// [`PhyloTree::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional, e.g. when provided by a Nexus file
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// # Arguments
    /// `num_leaves` - expected number of leaves, used as capacity hint only
    pub fn new(num_leaves: usize) -> Self {
        let capacity = (2 * num_leaves).saturating_sub(1);
        PhyloTree {
            name: None,
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in left-to-right order
    /// * `branch_length` - Optional stem length above the root
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or a child is a root.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_root(index, children, branch_length));
        self.root_index = index;

        index
    }

    /// Adds a root without stem length; see [PhyloTree::add_root].
    pub fn add_root_without_branch(&mut self, children: Vec<VertexIndex>) -> VertexIndex {
        self.add_root(children, None)
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in left-to-right order
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or a child is a root.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    /// * `label` - Taxon label of this leaf
    pub fn add_leaf<S: Into<String>>(
        &mut self,
        branch_length: Option<BranchLength>,
        label: S,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label.into()));
        index
    }

    /// Makes the parentless vertex at `index` the root of this tree.
    ///
    /// An internal vertex is turned into a [Vertex::Root]; a leaf stays a
    /// leaf, yielding a single-leaf tree.
    pub(crate) fn promote_to_root(&mut self, index: VertexIndex) {
        let vertex = std::mem::replace(
            &mut self.vertices[index],
            Vertex::new_root(index, Vec::new(), None),
        );
        self.vertices[index] = vertex.into_root();
        self.root_index = index;
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns all vertices in arena order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the leaf labels in canonical order, that is, left-to-right
    /// as the tree would be drawn (pre-order).
    ///
    /// Rows of a reconciled dataset follow exactly this order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter().filter_map(|v| v.label()).collect()
    }

    /// Returns the index of the leaf with the given label, if any.
    pub fn find_leaf(&self, label: &str) -> Option<VertexIndex> {
        self.vertices
            .iter()
            .find(|v| v.label() == Some(label))
            .map(|v| v.index())
    }

    /// Returns the distance from the top of the root's stem to each leaf,
    /// in canonical leaf order.
    ///
    /// The stem counts towards the distance, so collapsing a unary root
    /// into its child keeps all distances unchanged.
    ///
    /// # Returns
    /// `None` if some non-root vertex lacks a branch length.
    pub fn root_to_tip_distances(&self) -> Option<Vec<(&str, f64)>> {
        if !self.vertices_have_branch_lengths() {
            return None;
        }

        let mut depths = vec![0.0; self.num_vertices()];
        let mut result = Vec::new();
        for vertex in self.pre_order_iter() {
            let own = vertex.branch_length().map_or(0.0, |bl| *bl);
            let depth = match vertex.parent() {
                Some(parent) => depths[parent] + own,
                None => own,
            };
            depths[vertex.index()] = depth;
            if let Some(label) = vertex.label() {
                result.push((label, depth));
            }
        }

        Some(result)
    }

    /// Returns the height of this tree, that is, the largest root-to-tip
    /// distance, or `None` if branch lengths or leaves are missing.
    pub fn height(&self) -> Option<f64> {
        self.root_to_tip_distances()?
            .into_iter()
            .map(|(_, d)| d)
            .reduce(f64::max)
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from root).
    ///
    /// Distances `d_i` count as equal if
    /// `|d_max - d_i| <= max(abs_tol, rel_tol * d_max)`.
    /// A tree with missing branch lengths or without leaves is not ultrametric.
    pub fn is_ultrametric_within(&self, rel_tol: f64, abs_tol: f64) -> bool {
        let Some(distances) = self.root_to_tip_distances() else {
            return false;
        };
        let Some(max) = distances.iter().map(|&(_, d)| d).reduce(f64::max) else {
            return false;
        };
        let tolerance = abs_tol.max(rel_tol * max.abs());
        distances.iter().all(|(_, d)| (max - d).abs() <= tolerance)
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .enumerate()
            .all(|(index, vertex)| index == self.root_index || vertex.has_branch_length())
    }

    /// Returns the labels occurring on more than one leaf, sorted.
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in self.vertices.iter().filter_map(|v| v.label()) {
            *counts.entry(label).or_default() += 1;
        }
        let mut duplicates: Vec<String> = counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(label, _)| label.to_string())
            .collect();
        duplicates.sort();
        duplicates
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl PhyloTree {
    /// Validates the tree structure and all index references, including
    /// uniqueness of leaf labels.
    ///
    /// See [PhyloTree::validate_topology] for the structural checks.
    pub fn validate(&self) -> Result<(), StructuralTreeError> {
        self.validate_topology()?;
        let labels = self.duplicate_labels();
        if !labels.is_empty() {
            return Err(StructuralTreeError::DuplicateLabels { labels });
        }
        Ok(())
    }

    /// Validates the topology of this tree, ignoring labels.
    ///
    /// Checks:
    /// - Tree is non-empty and root index points to the single root
    ///   (a root [Vertex::Leaf] only in a single-vertex tree)
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Every vertex is reached exactly once from the root
    pub fn validate_topology(&self) -> Result<(), StructuralTreeError> {
        if self.vertices.is_empty() {
            return Err(StructuralTreeError::EmptyTree);
        }
        if self.root_index >= self.vertices.len() {
            return Err(StructuralTreeError::NoRoot);
        }

        let num_roots = self.vertices.iter().filter(|v| v.is_root()).count();
        if num_roots > 1 {
            return Err(StructuralTreeError::MultipleRoots { count: num_roots });
        }
        let root = &self.vertices[self.root_index];
        let root_ok = root.is_root() || (root.is_leaf() && self.vertices.len() == 1);
        if !root_ok || root.has_parent() {
            return Err(StructuralTreeError::NoRoot);
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return Err(StructuralTreeError::BrokenLink { vertex: index });
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return Err(StructuralTreeError::BrokenLink { vertex: index });
                }
            }

            if index != self.root_index {
                let Some(parent) = vertex.parent() else {
                    return Err(StructuralTreeError::BrokenLink { vertex: index });
                };
                if parent >= self.vertices.len()
                    || !self.vertices[parent].children().contains(&index)
                {
                    return Err(StructuralTreeError::BrokenLink { vertex: index });
                }
            }
        }

        // Reachability; a vertex seen twice means the links loop
        let mut seen = vec![false; self.vertices.len()];
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if seen[index] {
                return Err(StructuralTreeError::Cycle { vertex: index });
            }
            seen[index] = true;
            stack.extend(self.vertices[index].children().iter().copied());
        }
        let unreachable = seen.iter().filter(|&&s| !s).count();
        if unreachable > 0 {
            return Err(StructuralTreeError::Unreachable { count: unreachable });
        }

        Ok(())
    }
}

impl std::ops::Index<VertexIndex> for PhyloTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for PhyloTree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Rendering (pub)
// ============================================================================
impl PhyloTree {
    /// Renders a visual representation of the tree.
    ///
    /// # Example Output
    /// ```text
    /// Tree with 3 leaves (5 vertices total):
    /// [4] Root
    ///   ├─ [2] Internal (branch: 0.300)
    ///   │   ├─ [0] Leaf "A" (branch: 0.100)
    ///   │   └─ [1] Leaf "B" (branch: 0.200)
    ///   └─ [3] Leaf "C" (branch: 0.400)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Tree with {} leaves ({} vertices total):",
            self.num_leaves(),
            self.vertices.len()
        );
        if !self.is_root_set() {
            out.push_str("(No root set)\n");
            return out;
        }

        // (index, prefix of this line, prefix handed to children, is_last)
        let mut stack: Vec<(VertexIndex, String, bool)> = vec![(self.root_index, String::new(), true)];
        let mut is_top = true;
        while let Some((index, prefix, is_last)) = stack.pop() {
            let vertex = &self.vertices[index];
            let connector = if is_top {
                ""
            } else if is_last {
                "└─ "
            } else {
                "├─ "
            };
            let branch_str = match vertex.branch_length() {
                Some(bl) => format!(" (branch: {:.3})", *bl),
                None if vertex.is_root() => String::new(),
                None => " (no branch)".to_string(),
            };
            let kind = match vertex {
                Vertex::Root { .. } => "Root".to_string(),
                Vertex::Internal { .. } => "Internal".to_string(),
                Vertex::Leaf { label, .. } => format!("Leaf \"{}\"", label),
            };
            let _ = writeln!(out, "{}{}[{}] {}{}", prefix, connector, index, kind, branch_str);

            let child_prefix = if is_top {
                "  ".to_string()
            } else {
                format!("{}{}   ", prefix, if is_last { " " } else { "│" })
            };
            is_top = false;

            let children = vertex.children();
            for (position, &child) in children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), position + 1 == children.len()));
            }
        }

        out
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself,
    /// children from left to right.
    /// This is useful for aggregating data from leaves upward and for
    /// rebuilding a tree bottom-up.
    ///
    /// Expects a tree without cycles, see [PhyloTree::validate_topology].
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    /// This is useful for propagating data from root to leaves.
    ///
    /// Expects a tree without cycles, see [PhyloTree::validate_topology].
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the leaves in canonical order.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.pre_order_iter().filter(|v| v.is_leaf())
    }

    /// Returns the set of leaf labels.
    pub fn leaf_label_set(&self) -> HashSet<&str> {
        self.vertices.iter().filter_map(|v| v.label()).collect()
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children right first, so left is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        self.stack.extend(vertex.children().iter().rev().copied());

        Some(vertex)
    }
}
