//! Structural signature of one CPG

use serde::{Deserialize, Serialize};

use super::cwe::CweCategory;

/// CSV column order; stable across runs
pub const SIGNATURE_COLUMNS: [&str; 26] = [
    "instance_id",
    "num_nodes",
    "num_edges",
    "density",
    "avg_degree",
    "cyclomatic_complexity",
    "loop_count",
    "conditional_count",
    "buffer_overflow_calls",
    "use_after_free_calls",
    "buffer_underread_calls",
    "race_condition_calls",
    "info_disclosure_calls",
    "input_validation_calls",
    "privilege_calls",
    "resource_leak_calls",
    "null_deref_calls",
    "malloc_calls",
    "free_calls",
    "memory_ops",
    "total_dangerous_calls",
    "reaching_def_edges",
    "cfg_edges",
    "cdg_edges",
    "ast_edges",
    "is_flat_cpg",
];

/// Graph metrics, control counts and CWE-indexed call counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub instance_id: String,
    pub num_nodes: usize,
    pub num_edges: usize,
    /// e / max(n·(n−1), 1)
    pub density: f64,
    /// 2e / n
    pub avg_degree: f64,
    /// loops + conditionals + 1
    pub cyclomatic_complexity: usize,
    pub loop_count: usize,
    pub conditional_count: usize,
    pub buffer_overflow_calls: usize,
    pub use_after_free_calls: usize,
    pub buffer_underread_calls: usize,
    pub race_condition_calls: usize,
    pub info_disclosure_calls: usize,
    pub input_validation_calls: usize,
    pub privilege_calls: usize,
    pub resource_leak_calls: usize,
    pub null_deref_calls: usize,
    pub malloc_calls: usize,
    pub free_calls: usize,
    pub memory_ops: usize,
    pub total_dangerous_calls: usize,
    pub reaching_def_edges: usize,
    pub cfg_edges: usize,
    pub cdg_edges: usize,
    pub ast_edges: usize,
    pub is_flat_cpg: bool,
}

impl Signature {
    /// Counter for a CWE category
    pub fn category_count(&self, category: CweCategory) -> usize {
        match category {
            CweCategory::BufferOverflow => self.buffer_overflow_calls,
            CweCategory::UseAfterFree => self.use_after_free_calls,
            CweCategory::BufferUnderread => self.buffer_underread_calls,
            CweCategory::RaceCondition => self.race_condition_calls,
            CweCategory::InfoDisclosure => self.info_disclosure_calls,
            CweCategory::InputValidation => self.input_validation_calls,
            CweCategory::Privilege => self.privilege_calls,
            CweCategory::ResourceLeak => self.resource_leak_calls,
            CweCategory::NullDeref => self.null_deref_calls,
        }
    }

    pub(crate) fn category_count_mut(&mut self, category: CweCategory) -> &mut usize {
        match category {
            CweCategory::BufferOverflow => &mut self.buffer_overflow_calls,
            CweCategory::UseAfterFree => &mut self.use_after_free_calls,
            CweCategory::BufferUnderread => &mut self.buffer_underread_calls,
            CweCategory::RaceCondition => &mut self.race_condition_calls,
            CweCategory::InfoDisclosure => &mut self.info_disclosure_calls,
            CweCategory::InputValidation => &mut self.input_validation_calls,
            CweCategory::Privilege => &mut self.privilege_calls,
            CweCategory::ResourceLeak => &mut self.resource_leak_calls,
            CweCategory::NullDeref => &mut self.null_deref_calls,
        }
    }

    /// Row values in [`SIGNATURE_COLUMNS`] order
    pub fn values(&self) -> [String; 26] {
        [
            self.instance_id.clone(),
            self.num_nodes.to_string(),
            self.num_edges.to_string(),
            self.density.to_string(),
            self.avg_degree.to_string(),
            self.cyclomatic_complexity.to_string(),
            self.loop_count.to_string(),
            self.conditional_count.to_string(),
            self.buffer_overflow_calls.to_string(),
            self.use_after_free_calls.to_string(),
            self.buffer_underread_calls.to_string(),
            self.race_condition_calls.to_string(),
            self.info_disclosure_calls.to_string(),
            self.input_validation_calls.to_string(),
            self.privilege_calls.to_string(),
            self.resource_leak_calls.to_string(),
            self.null_deref_calls.to_string(),
            self.malloc_calls.to_string(),
            self.free_calls.to_string(),
            self.memory_ops.to_string(),
            self.total_dangerous_calls.to_string(),
            self.reaching_def_edges.to_string(),
            self.cfg_edges.to_string(),
            self.cdg_edges.to_string(),
            self.ast_edges.to_string(),
            if self.is_flat_cpg { "True" } else { "False" }.to_string(),
        ]
    }
}
