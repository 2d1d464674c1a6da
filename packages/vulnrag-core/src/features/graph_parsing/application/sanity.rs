//! CPG sanity checks
//!
//! Classifies exported graph documents as OK or KO before they enter a
//! corpus. A document is KO when it cannot be decoded or when it has no
//! vertices or no edges. Missing essential labels are recorded but do not
//! fail the check.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::features::graph_parsing::application::GraphParser;
use crate::features::graph_parsing::domain::LabelHistogram;
use crate::features::graph_parsing::error::GraphParseError;
use crate::shared::constants::labels::{
    AST, CALL, CFG, CONTROL_STRUCTURE, IDENTIFIER, REACHING_DEF,
};
use crate::shared::utils::csv;

/// Vertex labels structural retrieval relies on
pub const ESSENTIAL_VERTEX_LABELS: &[&str] = &[CALL, CONTROL_STRUCTURE, IDENTIFIER];

/// Edge labels structural retrieval relies on
pub const ESSENTIAL_EDGE_LABELS: &[&str] = &[AST, CFG, REACHING_DEF];

/// Labels listed per kind in `top_*_types`
pub const TOP_TYPES: usize = 6;

pub const REPORT_COLUMNS: &[&str] = &[
    "filename",
    "relative_path",
    "status",
    "reason",
    "vertex_count",
    "edge_count",
    "vertex_types",
    "edge_types",
    "missing_vertices",
    "missing_edges",
    "top_vertex_types",
    "top_edge_types",
    "file_size_mb",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Ko,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Ko => "KO",
        }
    }
}

/// Outcome of checking one document
#[derive(Debug, Clone, Serialize)]
pub struct CpgCheck {
    pub filename: String,
    pub relative_path: String,
    pub status: CheckStatus,
    /// `success`, `parse_failed`, `empty_graph: ...` or `exception: ...`
    pub reason: String,
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Distinct vertex labels
    pub vertex_types: usize,
    /// Distinct edge labels
    pub edge_types: usize,
    /// `None` unless the document decoded and is non-empty
    pub missing_vertices: Option<Vec<String>>,
    pub missing_edges: Option<Vec<String>>,
    pub top_vertex_types: Vec<(String, usize)>,
    pub top_edge_types: Vec<(String, usize)>,
    pub file_size_mb: f64,
}

impl CpgCheck {
    fn failed(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            relative_path: path.display().to_string(),
            status: CheckStatus::Ko,
            reason: reason.into(),
            vertex_count: 0,
            edge_count: 0,
            vertex_types: 0,
            edge_types: 0,
            missing_vertices: None,
            missing_edges: None,
            top_vertex_types: Vec::new(),
            top_edge_types: Vec::new(),
            file_size_mb: file_size_mb(path),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }

    /// One console line: status, counts, top labels and missing labels
    pub fn message(&self) -> String {
        if !self.is_ok() {
            return format!("KO | {}", self.reason);
        }
        let show = |top: &[(String, usize)]| {
            top.iter()
                .map(|(label, count)| format!("{label}:{count}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "OK | nodes={} edges={} | topV: {} | topE: {} | missingV={} missingE={}",
            self.vertex_count,
            self.edge_count,
            show(&self.top_vertex_types),
            show(&self.top_edge_types),
            join_missing(&self.missing_vertices),
            join_missing(&self.missing_edges),
        )
    }

    /// Report row in [`REPORT_COLUMNS`] order
    pub fn values(&self) -> [String; 13] {
        [
            self.filename.clone(),
            self.relative_path.clone(),
            self.status.as_str().to_string(),
            self.reason.clone(),
            self.vertex_count.to_string(),
            self.edge_count.to_string(),
            self.vertex_types.to_string(),
            self.edge_types.to_string(),
            join_missing(&self.missing_vertices),
            join_missing(&self.missing_edges),
            join_top(&self.top_vertex_types),
            join_top(&self.top_edge_types),
            format!("{:.2}", self.file_size_mb),
        ]
    }
}

fn join_missing(missing: &Option<Vec<String>>) -> String {
    match missing {
        None => String::new(),
        Some(labels) if labels.is_empty() => "None".to_string(),
        Some(labels) => labels.join("|"),
    }
}

fn join_top(top: &[(String, usize)]) -> String {
    top.iter()
        .map(|(label, count)| format!("{label}:{count}"))
        .collect::<Vec<_>>()
        .join("|")
}

fn file_size_mb(path: &Path) -> f64 {
    let bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// The `n` most frequent labels, ties broken by label
pub fn top_labels(histogram: &LabelHistogram, n: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = histogram
        .iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

fn missing_labels(histogram: &LabelHistogram, essential: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = essential
        .iter()
        .copied()
        .filter(|label| !histogram.contains(label))
        .map(str::to_string)
        .collect();
    missing.sort();
    missing
}

/// Check a single document
pub fn check_file(path: &Path) -> CpgCheck {
    let graph = match GraphParser::load(path) {
        Ok(graph) => graph,
        Err(GraphParseError::Io { source, .. }) => {
            return CpgCheck::failed(path, format!("exception: {source}"));
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "graph document rejected");
            return CpgCheck::failed(path, "parse_failed");
        }
    };

    let vertices = graph.vertex_histogram();
    let edges = graph.edge_histogram();
    let mut check = CpgCheck::failed(path, "");
    check.vertex_count = graph.vertex_count();
    check.edge_count = graph.edge_count();
    check.vertex_types = vertices.distinct();
    check.edge_types = edges.distinct();

    if check.vertex_count == 0 || check.edge_count == 0 {
        check.reason = format!(
            "empty_graph: nodes={}, edges={}",
            check.vertex_count, check.edge_count
        );
        return check;
    }

    check.missing_vertices = Some(missing_labels(&vertices, ESSENTIAL_VERTEX_LABELS));
    check.missing_edges = Some(missing_labels(&edges, ESSENTIAL_EDGE_LABELS));
    check.top_vertex_types = top_labels(&vertices, TOP_TYPES);
    check.top_edge_types = top_labels(&edges, TOP_TYPES);
    check.status = CheckStatus::Ok;
    check.reason = "success".to_string();
    check
}

/// Every `*.json` under `root`, recursively, sorted by path
pub fn collect_json_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Checks for a set of documents
#[derive(Debug, Clone, Default, Serialize)]
pub struct SanityReport {
    pub checks: Vec<CpgCheck>,
}

impl SanityReport {
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn ok(&self) -> usize {
        self.checks.iter().filter(|c| c.is_ok()).count()
    }

    pub fn ko(&self) -> usize {
        self.total() - self.ok()
    }

    pub fn all_ok(&self) -> bool {
        self.ko() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CpgCheck> {
        self.checks.iter().filter(|c| !c.is_ok())
    }
}

/// Check every `*.json` under `root`; `relative_path` is relative to `root`
pub fn check_dir(root: &Path) -> io::Result<SanityReport> {
    let files = collect_json_files(root)?;
    let checks = files
        .iter()
        .map(|path| {
            let mut check = check_file(path);
            if let Ok(relative) = path.strip_prefix(root) {
                check.relative_path = relative.display().to_string();
            }
            check
        })
        .collect::<Vec<_>>();
    let report = SanityReport { checks };
    info!(
        root = %root.display(),
        total = report.total(),
        ok = report.ok(),
        ko = report.ko(),
        "cpg sanity check complete"
    );
    Ok(report)
}

/// Header plus one row per check
pub fn write_report<W: Write>(mut writer: W, checks: &[CpgCheck]) -> io::Result<()> {
    writeln!(writer, "{}", REPORT_COLUMNS.join(","))?;
    for check in checks {
        writeln!(writer, "{}", csv::row(check.values()))?;
    }
    writer.flush()
}

/// Write the report to `path`, creating parent directories
pub fn write_report_file(path: &Path, checks: &[CpgCheck]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_report(BufWriter::new(File::create(path)?), checks)
}
