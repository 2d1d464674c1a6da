//! Structural features

use serde::{Deserialize, Serialize};

use crate::shared::constants::features::STRUCTURAL_DIMENSIONS;
use crate::shared::utils::math::safe_ratio;

/// Graph topology and control-flow metrics of one code fragment.
///
/// Complexity figures are heuristic estimates derived from label counts, not
/// exact McCabe numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralFeatures {
    pub node_count: usize,
    pub edge_count: usize,
    /// edges / nodes
    pub graph_density: f64,
    /// 2·edges / nodes
    pub avg_degree: f64,
    pub cyclomatic_complexity: usize,
    pub nesting_depth: usize,
    pub essential_complexity: usize,
    pub control_structure_count: usize,
    pub block_count: usize,
    pub method_count: usize,
    /// Shannon entropy (base 2) of call-name frequencies
    pub call_entropy: f64,
    /// calls / nodes
    pub calls_per_node: f64,
    /// control structures / nodes
    pub control_ratio: f64,
}

impl StructuralFeatures {
    /// Fill the ratio fields from the counts already set.
    ///
    /// Every ratio is 0 when `node_count` is 0.
    pub fn with_ratios(mut self, call_count: usize) -> Self {
        let nodes = self.node_count as f64;
        self.graph_density = safe_ratio(self.edge_count as f64, nodes);
        self.avg_degree = safe_ratio(2.0 * self.edge_count as f64, nodes);
        self.calls_per_node = safe_ratio(call_count as f64, nodes);
        self.control_ratio = safe_ratio(self.control_structure_count as f64, nodes);
        self
    }

    /// Fixed-order retrieval vector (avg_degree is derivable from density
    /// and is not part of it)
    pub fn to_vector(&self) -> [f64; STRUCTURAL_DIMENSIONS] {
        [
            self.node_count as f64,
            self.edge_count as f64,
            self.graph_density,
            self.cyclomatic_complexity as f64,
            self.nesting_depth as f64,
            self.essential_complexity as f64,
            self.control_structure_count as f64,
            self.block_count as f64,
            self.method_count as f64,
            self.call_entropy,
            self.calls_per_node,
            self.control_ratio,
        ]
    }
}
