//! Label histograms, statistics and schema validation

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::shared::utils::math::safe_ratio;

/// Count per label, iterated in label order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelHistogram(BTreeMap<String, usize>);

impl LabelHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        *self.0.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Count for `label` (0 when absent)
    pub fn get(&self, label: &str) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct labels
    pub fn distinct(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn labels(&self) -> BTreeSet<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, usize> {
        &self.0
    }
}

impl<'a> FromIterator<&'a str> for LabelHistogram {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut histogram = Self::new();
        for label in iter {
            histogram.increment(label);
        }
        histogram
    }
}

/// Basic graph statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Distinct vertices, including edge-only endpoints
    pub vertex_count: usize,
    pub edge_count: usize,
    /// edges / vertices (0 for an empty graph)
    pub density: f64,
}

impl GraphStats {
    pub fn new(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertex_count,
            edge_count,
            density: safe_ratio(edge_count as f64, vertex_count as f64),
        }
    }
}

/// Comparison of the labels found in a graph with an expected label set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValidation {
    /// Expected labels present in the graph
    pub expected_found: usize,
    /// Size of the expected set
    pub total_expected: usize,
    /// Labels present but not expected (sorted)
    pub additional: Vec<String>,
    /// Labels expected but absent (sorted)
    pub missing: Vec<String>,
}

impl LabelValidation {
    pub fn compare(found: &LabelHistogram, expected: &[&str]) -> Self {
        let found: BTreeSet<&str> = found.labels();
        let expected: BTreeSet<&str> = expected.iter().copied().collect();

        Self {
            expected_found: found.intersection(&expected).count(),
            total_expected: expected.len(),
            additional: found.difference(&expected).map(|s| s.to_string()).collect(),
            missing: expected.difference(&found).map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Vertex and edge label validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub vertices: LabelValidation,
    pub edges: LabelValidation,
}
