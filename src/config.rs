//! Configuration of tolerances and table reading.
//!
//! [ReconcileConfig] is built in code with `with_*` methods, or loaded from
//! TOML, where every field is optional:
//!
//! ```toml
//! relative_tolerance = 1e-8
//! absolute_tolerance = 1e-12
//! missing_values = ["NA", "", "?"]
//! ```

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Default relative tolerance for comparing root-to-tip distances
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-8;

/// Default absolute tolerance for comparing root-to-tip distances
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-12;

/// Settings shared by tree checks and dataset reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Relative tolerance for ultrametricity, scaled by the tree height
    pub relative_tolerance: f64,

    /// Absolute floor for the ultrametricity tolerance
    pub absolute_tolerance: f64,

    /// Raw field values read as missing; the first one is written for
    /// missing cells
    pub missing_values: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            missing_values: vec!["NA".to_string(), String::new()],
        }
    }
}

impl ReconcileConfig {
    /// Sets the relative ultrametricity tolerance.
    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    /// Sets the absolute ultrametricity tolerance.
    pub fn with_absolute_tolerance(mut self, tolerance: f64) -> Self {
        self.absolute_tolerance = tolerance;
        self
    }

    /// Replaces the missing-value sentinels.
    pub fn with_missing_values<I, S>(mut self, sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = sentinels.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether a raw field is a missing-value sentinel.
    pub fn is_missing(&self, raw: &str) -> bool {
        self.missing_values.iter().any(|m| m == raw.trim())
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
