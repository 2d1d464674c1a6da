//! Offline index construction from a corpus file
//!
//! ```text
//! corpus.json ─▶ CorpusRecord ─┬─ VULN  (code_before_change, vuln_cpg)
//!                              └─ PATCH (code_after_change, patch_cpg)
//!                                   │
//!                 features (par) ─▶ scaler + tfidf fit ─▶ SimilarityIndex ─▶ artifacts
//! ```
//!
//! `build_to_dir` also writes `manifest.json` (the [`BuildReport`]).

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::features::feature_extraction::{ExtractedFeatures, HybridFeatureExtractor};
use crate::features::graph_parsing::GraphParser;
use crate::features::lexical::TfidfVectorizer;
use crate::features::retrieval::domain::{IndexEntry, PatternType, VulnerabilityMetadata};
use crate::features::retrieval::error::RetrievalError;
use crate::features::retrieval::infrastructure::artifacts::save_index;
use crate::features::retrieval::infrastructure::scaler::StandardScaler;
use crate::features::retrieval::infrastructure::similarity_index::SimilarityIndex;
use crate::features::retrieval::ports::EmbeddingProvider;
use crate::shared::constants::features::STRUCTURAL_DIMENSIONS;

/// One vulnerability/patch pair of the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub entry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(alias = "cve")]
    pub cve_id: String,
    #[serde(alias = "cwe")]
    pub cwe_id: String,
    pub code_before_change: String,
    pub code_after_change: String,
    /// Pre-generated graph document of the vulnerable code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vuln_cpg: Option<Value>,
    /// Pre-generated graph document of the patched code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_cpg: Option<Value>,
    #[serde(default)]
    pub metadata: VulnerabilityMetadata,
}

impl CorpusRecord {
    fn side(&self, pattern_type: PatternType) -> (&str, Option<&Value>) {
        match pattern_type {
            PatternType::Vuln => (&self.code_before_change, self.vuln_cpg.as_ref()),
            PatternType::Patch => (&self.code_after_change, self.patch_cpg.as_ref()),
        }
    }

    /// Metadata with the code of both sides filled in when the record omits them
    fn metadata(&self) -> VulnerabilityMetadata {
        let mut metadata = self.metadata.clone();
        metadata
            .code_before_change
            .get_or_insert_with(|| self.code_before_change.clone());
        metadata
            .code_after_change
            .get_or_insert_with(|| self.code_after_change.clone());
        metadata
    }
}

/// Read a corpus file (JSON array of records)
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusRecord>, RetrievalError> {
    if !path.exists() {
        return Err(RetrievalError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| RetrievalError::io(path, e))?;
    let records: Vec<CorpusRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RetrievalError::corrupt(path, e.to_string()))?;

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = records.iter().find(|r| !seen.insert(r.entry_id.as_str())) {
        return Err(RetrievalError::InvalidCorpus(format!(
            "duplicate entry_id {}",
            dup.entry_id
        )));
    }
    Ok(records)
}

/// Per-index build counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBuildStats {
    pub entries: usize,
    pub graph_features: usize,
    pub text_features: usize,
    pub degraded_embeddings: usize,
    pub vocabulary: usize,
}

pub const MANIFEST_FILE: &str = "manifest.json";

/// Outcome of a full build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub built_at: DateTime<Utc>,
    pub embedding_provider: String,
    pub embedding_dimension: usize,
    pub records: usize,
    pub vuln: IndexBuildStats,
    pub patch: IndexBuildStats,
}

struct Row {
    features: ExtractedFeatures,
    from_graph: bool,
    embedding: Vec<f64>,
    degraded: bool,
}

/// Builds both indexes from corpus records
pub struct IndexBuilder<P> {
    extractor: HybridFeatureExtractor,
    embedder: P,
}

impl<P: EmbeddingProvider> IndexBuilder<P> {
    pub fn new(embedder: P) -> Self {
        Self::with_extractor(HybridFeatureExtractor::new(), embedder)
    }

    pub fn with_extractor(extractor: HybridFeatureExtractor, embedder: P) -> Self {
        Self {
            extractor,
            embedder,
        }
    }

    pub fn embedder(&self) -> &P {
        &self.embedder
    }

    /// Build one index; records keep their corpus order
    pub fn build_index(
        &self,
        records: &[CorpusRecord],
        pattern_type: PatternType,
    ) -> Result<(SimilarityIndex, IndexBuildStats), RetrievalError> {
        let rows: Vec<Row> = records
            .par_iter()
            .map(|record| self.row(record, pattern_type))
            .collect();

        let structural: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| row.features.structural.to_vector().to_vec())
            .collect();
        let scaler = StandardScaler::fit(&structural, STRUCTURAL_DIMENSIONS);
        let scaled = structural.iter().map(|r| scaler.transform(r)).collect();

        let texts: Vec<&str> = rows
            .iter()
            .map(|row| row.features.semantic.combined_text.as_str())
            .collect();
        let (tfidf, tfidf_rows) = TfidfVectorizer::fit_transform(&texts);

        let stats = IndexBuildStats {
            entries: rows.len(),
            graph_features: rows.iter().filter(|r| r.from_graph).count(),
            text_features: rows.iter().filter(|r| !r.from_graph).count(),
            degraded_embeddings: rows.iter().filter(|r| r.degraded).count(),
            vocabulary: tfidf.dimension(),
        };

        let mut entries = Vec::with_capacity(rows.len());
        let mut embeddings = Vec::with_capacity(rows.len());
        for (record, row) in records.iter().zip(rows) {
            entries.push(IndexEntry {
                entry_id: record.entry_id.clone(),
                instance_id: record.instance_id.clone(),
                cve_id: record.cve_id.clone(),
                cwe_id: record.cwe_id.clone(),
                pattern_type,
                structural_features: row.features.structural,
                semantic_features: row.features.semantic,
                vulnerability_metadata: record.metadata(),
            });
            embeddings.push(row.embedding);
        }

        let index = SimilarityIndex::from_parts(
            pattern_type,
            entries,
            scaled,
            scaler,
            tfidf,
            tfidf_rows,
            embeddings,
        )
        .map_err(RetrievalError::InvalidCorpus)?;

        info!(
            pattern = %pattern_type,
            entries = stats.entries,
            graph = stats.graph_features,
            text = stats.text_features,
            degraded_embeddings = stats.degraded_embeddings,
            vocabulary = stats.vocabulary,
            "built index"
        );
        Ok((index, stats))
    }

    /// Build both indexes and write their artifacts to `dir`
    pub fn build_to_dir(
        &self,
        records: &[CorpusRecord],
        dir: &Path,
    ) -> Result<BuildReport, RetrievalError> {
        let mut report = BuildReport {
            built_at: Utc::now(),
            embedding_provider: self.embedder.name().to_string(),
            embedding_dimension: self.embedder.dimension(),
            records: records.len(),
            vuln: IndexBuildStats::default(),
            patch: IndexBuildStats::default(),
        };
        for pattern_type in PatternType::ALL {
            let (index, stats) = self.build_index(records, pattern_type)?;
            save_index(dir, &index)?;
            match pattern_type {
                PatternType::Vuln => report.vuln = stats,
                PatternType::Patch => report.patch = stats,
            }
        }

        let manifest = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| RetrievalError::corrupt(&manifest, e.to_string()))?;
        std::fs::write(&manifest, json).map_err(|e| RetrievalError::io(&manifest, e))?;

        info!(dir = %dir.display(), records = report.records, "wrote index artifacts");
        Ok(report)
    }

    fn row(&self, record: &CorpusRecord, pattern_type: PatternType) -> Row {
        let (code, cpg) = record.side(pattern_type);

        let graph_features = cpg.and_then(|document| match GraphParser::load(document.clone()) {
            Ok(graph) if !graph.is_empty() => Some(self.extractor.extract_graph(&graph)),
            Ok(_) => None,
            Err(e) => {
                warn!(entry = %record.entry_id, pattern = %pattern_type, error = %e, "unusable graph document");
                None
            }
        });
        let from_graph = graph_features.is_some();
        let features = graph_features.unwrap_or_else(|| self.extractor.extract_text(code));

        let dimension = self.embedder.dimension();
        let (embedding, degraded) = match self.embedder.embed(code) {
            Ok(vector) if vector.len() == dimension => (vector, false),
            Ok(vector) => {
                warn!(
                    entry = %record.entry_id,
                    found = vector.len(),
                    expected = dimension,
                    "embedding has wrong dimension, using zeros"
                );
                (vec![0.0; dimension], true)
            }
            Err(e) => {
                warn!(entry = %record.entry_id, error = %e, "embedding failed, using zeros");
                (vec![0.0; dimension], true)
            }
        };

        Row {
            features,
            from_graph,
            embedding,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::retrieval::error::EmbeddingError;
    use crate::features::retrieval::infrastructure::artifacts::load_index;
    use serde_json::json;
    use tempfile::TempDir;

    struct LengthEmbedder;

    impl EmbeddingProvider for LengthEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
            if text.contains("FAIL") {
                return Err(EmbeddingError::Unavailable("fake outage".into()));
            }
            Ok(vec![text.len() as f64, 1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn record(id: &str, before: &str, after: &str) -> CorpusRecord {
        CorpusRecord {
            entry_id: id.into(),
            instance_id: None,
            cve_id: format!("CVE-2021-{id}"),
            cwe_id: "CWE-787".into(),
            code_before_change: before.into(),
            code_after_change: after.into(),
            vuln_cpg: None,
            patch_cpg: None,
            metadata: VulnerabilityMetadata::default(),
        }
    }

    fn corpus() -> Vec<CorpusRecord> {
        vec![
            record(
                "1",
                "void f(char *s){ char buf[8]; strcpy(buf, s); }",
                "void f(char *s){ char buf[8]; strncpy(buf, s, sizeof(buf)); }",
            ),
            record(
                "2",
                "void g(struct o *p){ kfree(p); p->x = 1; }",
                "void g(struct o *p){ kfree(p); p = NULL; }",
            ),
        ]
    }

    #[test]
    fn test_build_index_fills_all_parts() {
        let builder = IndexBuilder::new(LengthEmbedder);
        let (index, stats) = builder.build_index(&corpus(), PatternType::Vuln).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.embedding_dimension(), 3);
        assert_eq!(stats.text_features, 2);
        assert_eq!(stats.degraded_embeddings, 0);
        assert!(stats.vocabulary > 0);

        let entry = &index.entries()[0];
        assert_eq!(entry.pattern_type, PatternType::Vuln);
        assert_eq!(
            entry.vulnerability_metadata.code_after_change.as_deref(),
            Some(corpus()[0].code_after_change.as_str())
        );
    }

    #[test]
    fn test_failed_embedding_becomes_zeros() {
        let builder = IndexBuilder::new(LengthEmbedder);
        let records = vec![record("1", "int FAIL(void){ return 0; }", "int ok(void){ return 1; }")];
        let (index, stats) = builder.build_index(&records, PatternType::Vuln).unwrap();
        assert_eq!(stats.degraded_embeddings, 1);
        assert_eq!(index.embeddings[0], vec![0.0; 3]);
    }

    #[test]
    fn test_graph_document_preferred_over_text() {
        let mut rec = record("1", "int a;", "int b;");
        rec.vuln_cpg = Some(json!({
            "@type": "tinker:graph",
            "@value": {
                "vertices": [
                    {"id": 1, "label": "METHOD", "properties": {"NAME": "f"}},
                    {"id": 2, "label": "CALL", "properties": {"NAME": "strcpy"}}
                ],
                "edges": [{"outV": 1, "inV": 2, "label": "AST"}]
            }
        }));
        let builder = IndexBuilder::new(LengthEmbedder);
        let (_, vuln) = builder.build_index(&[rec.clone()], PatternType::Vuln).unwrap();
        let (_, patch) = builder.build_index(&[rec], PatternType::Patch).unwrap();
        assert_eq!(vuln.graph_features, 1);
        assert_eq!(patch.graph_features, 0);
    }

    #[test]
    fn test_build_to_dir_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let builder = IndexBuilder::new(LengthEmbedder);
        let report = builder.build_to_dir(&corpus(), dir.path()).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.patch.entries, 2);
        assert_eq!(report.embedding_dimension, 3);

        let manifest: BuildReport =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest, report);

        let patch = load_index(dir.path(), PatternType::Patch).unwrap();
        assert_eq!(patch.entries()[1].entry_id, "2");
    }

    #[test]
    fn test_load_corpus_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.json");
        let mut records = corpus();
        records[1].entry_id = "1".into();
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
        assert!(matches!(
            load_corpus(&path),
            Err(RetrievalError::InvalidCorpus(_))
        ));
    }

    #[test]
    fn test_load_corpus_accepts_short_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(
            &path,
            json!([{
                "entry_id": "e1",
                "cve": "CVE-2020-1",
                "cwe": "CWE-416",
                "code_before_change": "a",
                "code_after_change": "b",
                "metadata": {"vulnerability_type": "use after free"}
            }])
            .to_string(),
        )
        .unwrap();
        let records = load_corpus(&path).unwrap();
        assert_eq!(records[0].cve_id, "CVE-2020-1");
        assert_eq!(
            records[0].metadata.vulnerability_type.as_deref(),
            Some("use after free")
        );
    }
}
