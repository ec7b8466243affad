//! File input and output for datasets.
//!
//! Only tabular data is read here; trees come from an external parser
//! through [TreeBuilder](crate::model::TreeBuilder) and are written with
//! [newick](crate::newick).

pub mod delimited;

pub use delimited::{read_dataset, read_dataset_file, write_dataset, write_dataset_file};
