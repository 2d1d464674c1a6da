//! Parallel signature extraction over many graph files

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::extractor::{instance_id, SignatureExtractor};
use crate::features::signature::domain::Signature;

const GRAPH_EXTENSIONS: &[&str] = &["json", "graphson"];

/// Outcome counts of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    /// Graphs that parsed but had no vertices
    pub skipped_empty: usize,
    pub failed: usize,
    /// Instance ids of unreadable or malformed graphs, in input order
    pub failed_ids: Vec<String>,
}

/// Signatures plus the run summary
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub signatures: Vec<Signature>,
    pub summary: BatchSummary,
}

enum Outcome {
    Extracted(Signature),
    Empty,
    Failed(String),
}

/// Batch driver around [`SignatureExtractor`]
#[derive(Debug, Clone, Default)]
pub struct SignatureBatch {
    extractor: SignatureExtractor,
}

impl SignatureBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract signatures from `paths` in parallel; output keeps input order.
    pub fn run(&self, paths: &[PathBuf]) -> BatchResult {
        let outcomes: Vec<Outcome> = paths
            .par_iter()
            .map(|path| match self.extractor.extract_file(path) {
                Ok(Some(signature)) => Outcome::Extracted(signature),
                Ok(None) => Outcome::Empty,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "signature extraction failed");
                    Outcome::Failed(instance_id(path))
                }
            })
            .collect();

        let mut result = BatchResult::default();
        result.summary.processed = outcomes.len();
        for outcome in outcomes {
            match outcome {
                Outcome::Extracted(signature) => {
                    result.summary.succeeded += 1;
                    result.signatures.push(signature);
                }
                Outcome::Empty => result.summary.skipped_empty += 1,
                Outcome::Failed(id) => {
                    result.summary.failed += 1;
                    result.summary.failed_ids.push(id);
                }
            }
        }

        info!(
            processed = result.summary.processed,
            succeeded = result.summary.succeeded,
            skipped_empty = result.summary.skipped_empty,
            failed = result.summary.failed,
            "signature batch complete"
        );
        result
    }
}

/// Graph files (`*.json`, `*.graphson`) directly inside `dir`, sorted by name
pub fn collect_graph_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_graph = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| GRAPH_EXTENSIONS.contains(&ext));
        if path.is_file() && is_graph {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const GRAPH: &str = r#"{"@type":"tinker:graph","@value":{"vertices":[
        {"id":1,"label":"METHOD","properties":{"NAME":"memcpy"}}],"edges":[]}}"#;
    const EMPTY: &str = r#"{"@type":"tinker:graph","@value":{"vertices":[],"edges":[]}}"#;

    #[test]
    fn test_run_preserves_order_and_summarizes() {
        let dir = TempDir::new().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            path
        };
        let paths = vec![
            write("b.json", GRAPH),
            write("a.json", GRAPH),
            write("empty.json", EMPTY),
            write("broken.json", "{not json"),
            dir.path().join("missing.json"),
        ];

        let result = SignatureBatch::new().run(&paths);
        let ids: Vec<_> = result.signatures.iter().map(|s| s.instance_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(
            result.summary,
            BatchSummary {
                processed: 5,
                succeeded: 2,
                skipped_empty: 1,
                failed: 2,
                failed_ids: vec!["broken".into(), "missing".into()],
            }
        );
        assert_eq!(result.signatures[0].buffer_overflow_calls, 1);
    }

    #[test]
    fn test_collect_graph_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.graphson", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let files = collect_graph_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.graphson", "b.json"]);
    }
}
