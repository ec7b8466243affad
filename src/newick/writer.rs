//! Newick serialization of [PhyloTree]s.

use crate::model::{BranchLength, PhyloTree, VertexIndex};
use crate::newick::escape::escape_label;
use std::io::{self, BufWriter, Write};

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Writes given list of trees in Newick format, one tree per line.
///
/// # Arguments
/// * `writer` - Destination, e.g. a [File](std::fs::File)
/// * `trees` - Trees to write
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick<W: Write>(writer: W, trees: &[PhyloTree]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for tree in trees {
        writer.write_all(to_newick(tree).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Children are written in their stored order, so the leaf order of the
/// string is the tree's canonical leaf ordering. A root stem length is
/// written after the closing parenthesis of the root.
///
/// # Example
/// ```
/// use tipmatch::model::{BranchLength, PhyloTree};
/// use tipmatch::newick::to_newick;
///
/// let mut tree = PhyloTree::new(2);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(2.5)), "B");
/// tree.add_root_without_branch(vec![a, b]);
///
/// assert_eq!(to_newick(&tree), "(A:1,B:2.5);");
/// ```
pub fn to_newick(tree: &PhyloTree) -> String {
    // Helper for adding branch lengths
    fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
        if let Some(branch_length) = branch_length {
            newick.push(':');
            newick.push_str(&branch_length.to_string());
        }
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    if !tree.is_root_set() {
        newick.push(';');
        return newick;
    }

    // Explicit stack instead of recursion; `Close` emits ")" and the length
    enum Step {
        Open(VertexIndex),
        Comma,
        Close(VertexIndex),
    }
    let mut stack = vec![Step::Open(tree.root_index())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Comma => newick.push(','),
            Step::Close(index) => {
                newick.push(')');
                push_branch_length(&mut newick, tree[index].branch_length());
            }
            Step::Open(index) => {
                let vertex = &tree[index];
                if let Some(label) = vertex.label() {
                    newick.push_str(&escape_label(label));
                    push_branch_length(&mut newick, vertex.branch_length());
                    continue;
                }
                newick.push('(');
                stack.push(Step::Close(index));
                for (position, &child) in vertex.children().iter().enumerate().rev() {
                    stack.push(Step::Open(child));
                    if position > 0 {
                        stack.push(Step::Comma);
                    }
                }
            }
        }
    }
    newick.push(';');

    newick
}

/// Estimates the length of a Newick string for a given tree, to pre-allocate.
fn estimate_newick_len(tree: &PhyloTree) -> usize {
    // Each non-leaf vertex: "()" plus a comma per extra child
    const INTERNAL_NODE_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let structure_capacity = (tree.num_vertices() - tree.num_leaves()) * INTERNAL_NODE_CHARS;
    let label_capacity: usize = tree.leaves().filter_map(|v| v.label()).map(|l| l.len() + 2).sum();
    let branch_capacity = if tree.vertices_have_branch_lengths() {
        tree.num_vertices() * BRANCH_LENGTH_CHARS
    } else {
        0
    };

    structure_capacity + label_capacity + branch_capacity + BUFFER_CHARS
}
