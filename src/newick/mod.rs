//! Newick writer for phylogenetic trees.
//!
//! Trees are only written here, e.g. to save a reconciled tree next to its
//! reconciled dataset. Reading Newick is left to an external parser
//! feeding a [TreeBuilder](crate::model::TreeBuilder).
//!
//! # Format
//! * `tree ::= vertex [branch_length] ';'`
//! * `vertex ::= leaf | '(' vertex (',' vertex)* ')'`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Labels with special characters are single-quoted; see [escape].

pub mod escape;
pub mod writer;

pub use writer::{to_newick, write_newick};
