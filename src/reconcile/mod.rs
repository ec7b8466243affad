//! Tree and dataset reconciliation.
//!
//! Three stateless operations, usually applied in this order before any
//! model fit:
//! 1. [check_tree] - is the tree binary, rooted, ultrametric?
//! 2. [reconcile] - prune tree and filter/reorder dataset to shared taxa
//! 3. [subset_complete] - keep rows with values in the variables of interest
//!
//! [coerce_ultrametric] is a separate repair that is only ever applied when
//! called explicitly.

pub mod complete;
pub mod health;
pub mod matching;

pub use complete::{CompleteCases, subset_complete};
pub use health::{DepthTarget, TreeHealth, check_tree, check_tree_with, coerce_ultrametric};
pub use matching::{MismatchReport, ReconciledPair, prune_leaves, reconcile};
