//! Explicit dispatch over the kinds of values an analysis produces.
//!
//! Each [Artifact] variant has exactly one human-readable rendering
//! ([Artifact::display]) and one machine-readable one ([Artifact::to_json]).

use crate::error::Result;
use crate::model::{Dataset, PhyloTree};
use crate::newick::to_newick;
use crate::reconcile::{CompleteCases, MismatchReport, TreeHealth};
use serde_json::{Value, json};
use std::fmt::Write;

/// A value produced during an analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// A tree, e.g. a pruned tree
    Tree(PhyloTree),
    /// A dataset, e.g. a reconciled one
    Dataset(Dataset),
    /// Taxa found on only one side of a reconciliation
    Mismatch(MismatchReport),
    /// Result of a tree check
    Health(TreeHealth),
    /// Result of complete-case subsetting
    Complete(CompleteCases),
}

impl Artifact {
    /// Returns a short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Tree(_) => "tree",
            Artifact::Dataset(_) => "dataset",
            Artifact::Mismatch(_) => "mismatch",
            Artifact::Health(_) => "health",
            Artifact::Complete(_) => "complete",
        }
    }

    /// Renders the artifact for reading in a terminal.
    pub fn display(&self) -> String {
        match self {
            Artifact::Tree(tree) => tree.render(),
            Artifact::Dataset(dataset) => dataset.to_string(),
            Artifact::Mismatch(report) => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "In tree, not in data ({}): {}",
                    report.tree_not_data.len(),
                    join_or_none(report.tree_not_data.iter())
                );
                let _ = writeln!(
                    out,
                    "In data, not in tree ({}): {}",
                    report.data_not_tree.len(),
                    join_or_none(report.data_not_tree.iter())
                );
                out
            }
            Artifact::Health(health) => {
                let spread = health
                    .max_depth_spread
                    .map_or_else(|| "n/a".to_string(), |s| format!("{:e}", s));
                format!(
                    "Tree health ({} leaves):\n  binary: {}\n  rooted: {}\n  ultrametric: {} (depth spread {})\n",
                    health.num_leaves,
                    health.is_binary,
                    health.is_rooted,
                    health.is_ultrametric,
                    spread
                )
            }
            Artifact::Complete(cases) => format!(
                "{}Dropped {} incomplete rows: {}\n",
                cases.dataset,
                cases.rows_dropped(),
                join_or_none(cases.dropped_keys.iter())
            ),
        }
    }

    /// Serializes the artifact as a JSON object tagged with its kind.
    ///
    /// Trees are embedded as Newick strings.
    pub fn to_json(&self) -> Result<String> {
        let body: Value = match self {
            Artifact::Tree(tree) => json!({
                "name": tree.name(),
                "num_leaves": tree.num_leaves(),
                "newick": to_newick(tree),
            }),
            Artifact::Dataset(dataset) => serde_json::to_value(dataset)?,
            Artifact::Mismatch(report) => serde_json::to_value(report)?,
            Artifact::Health(health) => serde_json::to_value(health)?,
            Artifact::Complete(cases) => serde_json::to_value(cases)?,
        };
        let tagged = json!({ "kind": self.kind(), "value": body });
        Ok(serde_json::to_string_pretty(&tagged)?)
    }
}

fn join_or_none<'a, I: Iterator<Item = &'a String>>(items: I) -> String {
    let joined: Vec<&str> = items.map(String::as_str).collect();
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined.join(", ")
    }
}

impl From<PhyloTree> for Artifact {
    fn from(tree: PhyloTree) -> Self {
        Artifact::Tree(tree)
    }
}

impl From<Dataset> for Artifact {
    fn from(dataset: Dataset) -> Self {
        Artifact::Dataset(dataset)
    }
}

impl From<MismatchReport> for Artifact {
    fn from(report: MismatchReport) -> Self {
        Artifact::Mismatch(report)
    }
}

impl From<TreeHealth> for Artifact {
    fn from(health: TreeHealth) -> Self {
        Artifact::Health(health)
    }
}

impl From<CompleteCases> for Artifact {
    fn from(cases: CompleteCases) -> Self {
        Artifact::Complete(cases)
    }
}
