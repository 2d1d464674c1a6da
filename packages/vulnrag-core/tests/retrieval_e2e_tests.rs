//! Index build → load → hybrid retrieval → evidence

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use vulnrag_core::features::evidence::{ConfidenceLevel, DifferentialAnalysis};
use vulnrag_core::features::retrieval::{
    load_corpus, CachedEmbedder, EmbeddingError, EmbeddingProvider, HybridRetriever, PatternType,
    RetrievalError, MANIFEST_FILE,
};
use vulnrag_storage::{EmbeddingCache, InMemoryEmbeddingCache};

/// Shares one counting embedder between the retriever and the test
struct Shared(Arc<KeywordEmbedder>);

impl EmbeddingProvider for Shared {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        self.0.embed(text)
    }

    fn dimension(&self) -> usize {
        self.0.dimension()
    }
}

fn retriever_over(dir: &TempDir) -> HybridRetriever {
    HybridRetriever::load(dir.path(), Box::new(KeywordEmbedder::default()))
        .unwrap()
        .with_extractor(lexical_extractor())
}

#[test]
fn test_vulnerable_query_matches_its_cve() {
    let dir = TempDir::new().unwrap();
    build_index_dir(dir.path(), &small_corpus());
    assert!(dir.path().join(MANIFEST_FILE).exists());

    let result = retriever_over(&dir).hybrid_retrieval(OVERFLOW_BEFORE, 2).unwrap();

    assert_eq!(result.results.len(), 4);
    assert_eq!(result.retrieval_metadata.total_vuln_patterns, 2);
    assert_eq!(result.retrieval_metadata.total_patch_patterns, 2);
    assert!(!result.retrieval_metadata.embedding_degraded);
    assert!(!result.query_id.is_empty());

    let scores: Vec<f64> = result.results.iter().map(|r| r.hybrid_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_unit_interval(&scores);

    let top_vuln = result.results_of(PatternType::Vuln).next().unwrap();
    assert_eq!(top_vuln.cve_id, "CVE-2021-0001");
    assert_close(result.best_vuln_score, top_vuln.hybrid_score);

    assert_eq!(result.evidence_for.len(), 2);
    assert_eq!(result.evidence_against.len(), 2);
    let evidence = &result.evidence_for[0];
    assert_eq!(evidence.cve, "CVE-2021-0001");
    assert_eq!(evidence.cwe, "CWE-787");
    assert_eq!(evidence.vulnerability_type, "stack buffer overflow");
    assert_eq!(evidence.code_before, OVERFLOW_BEFORE.trim());
    assert_eq!(evidence.pattern_type, PatternType::Vuln);
    assert!(result
        .evidence_against
        .iter()
        .all(|e| e.pattern_type == PatternType::Patch));

    assert!(result.differential_analysis.is_analyzed());
}

#[test]
fn test_same_entry_pair_is_flagged() {
    let dir = TempDir::new().unwrap();
    let mut corpus = small_corpus();
    corpus.truncate(1);
    build_index_dir(dir.path(), &corpus);

    let result = retriever_over(&dir).hybrid_retrieval(OVERFLOW_BEFORE, 1).unwrap();
    match result.differential_analysis {
        DifferentialAnalysis::Analyzed {
            same_cve_pair,
            confidence_level,
            score_differential,
            ..
        } => {
            assert!(same_cve_pair);
            assert_close(score_differential, (result.best_vuln_score - result.best_patch_score).abs());
            assert_eq!(confidence_level, ConfidenceLevel::from_differential(score_differential));
        }
        other => panic!("expected analysis, got {other:?}"),
    }
}

#[test]
fn test_empty_corpus_gives_insufficient_data() {
    let dir = TempDir::new().unwrap();
    build_index_dir(dir.path(), &[]);

    let result = retriever_over(&dir).hybrid_retrieval(NESTED_STRCPY, 5).unwrap();
    assert!(result.results.is_empty());
    assert_eq!(result.best_vuln_score, 0.0);
    assert_eq!(result.best_patch_score, 0.0);
    assert!(result.evidence_for.is_empty());
    assert!(result.evidence_against.is_empty());
    assert_eq!(result.differential_analysis, DifferentialAnalysis::InsufficientData);
}

#[test]
fn test_failing_embedder_degrades_but_ranks() {
    let dir = TempDir::new().unwrap();
    build_index_dir(dir.path(), &small_corpus());

    let retriever = HybridRetriever::load(dir.path(), Box::new(FailingEmbedder))
        .unwrap()
        .with_extractor(lexical_extractor());
    let result = retriever.hybrid_retrieval(UAF_BEFORE, 1).unwrap();

    assert!(result.retrieval_metadata.embedding_degraded);
    assert_eq!(result.results.len(), 2);
    assert!(result.results.iter().all(|r| r.embedding_score == 0.0));
    assert!(result.best_vuln_score > 0.0);
}

#[test]
fn test_missing_artifacts() {
    let dir = TempDir::new().unwrap();
    let err = HybridRetriever::load(dir.path(), Box::new(KeywordEmbedder::default())).unwrap_err();
    assert!(matches!(err, RetrievalError::MissingArtifact { .. }));
}

#[test]
fn test_top_k_zero_rejected() {
    let dir = TempDir::new().unwrap();
    build_index_dir(dir.path(), &small_corpus());
    let err = retriever_over(&dir).hybrid_retrieval(NESTED_STRCPY, 0).unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidArgument(_)));
}

#[test]
fn test_repeated_query_hits_embedding_cache() {
    let dir = TempDir::new().unwrap();
    build_index_dir(dir.path(), &small_corpus());

    let counter = Arc::new(KeywordEmbedder::default());
    let cache: Arc<dyn EmbeddingCache> = Arc::new(InMemoryEmbeddingCache::new());
    let embedder = CachedEmbedder::new(Shared(Arc::clone(&counter)), Arc::clone(&cache));
    let retriever = HybridRetriever::load(dir.path(), Box::new(embedder))
        .unwrap()
        .with_extractor(lexical_extractor());

    let first = retriever.hybrid_retrieval(UAF_BEFORE, 1).unwrap();
    let second = retriever.hybrid_retrieval(UAF_BEFORE, 1).unwrap();

    assert_eq!(counter.calls(), 1);
    assert_eq!(cache.len().unwrap(), 1);
    assert_ne!(first.query_id, second.query_id);
    assert_eq!(first.best_vuln_score, second.best_vuln_score);
}

#[test]
fn test_corpus_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("corpus.json");
    std::fs::write(
        &corpus_path,
        serde_json::to_vec(&serde_json::json!([
            {
                "entry_id": "e1",
                "cve": "CVE-2022-0100",
                "cwe": "CWE-476",
                "code_before_change": "int f(struct s *p) { return p->x; }",
                "code_after_change": "int f(struct s *p) { if (!p) return 0; return p->x; }",
                "metadata": {"solution": "Add a null check on p"}
            }
        ]))
        .unwrap(),
    )
    .unwrap();

    let records = load_corpus(&corpus_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cve_id, "CVE-2022-0100");

    let index_dir = TempDir::new().unwrap();
    build_index_dir(index_dir.path(), &records);
    let result = retriever_over(&index_dir)
        .hybrid_retrieval("int g(struct s *p) { return p->x; }", 1)
        .unwrap();
    assert_eq!(result.evidence_against[0].solution, "Add a null check on p");
}
