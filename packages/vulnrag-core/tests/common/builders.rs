//! Corpus records and in-process embedding providers

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use vulnrag_core::features::feature_extraction::{HybridFeatureExtractor, LexicalStrategy};
use vulnrag_core::features::retrieval::{
    CorpusRecord, EmbeddingError, EmbeddingProvider, IndexBuilder, VulnerabilityMetadata,
};

use super::fixtures::{OVERFLOW_AFTER, OVERFLOW_BEFORE, UAF_AFTER, UAF_BEFORE};

pub const FAKE_DIMENSION: usize = 4;

/// Deterministic bag-of-keywords embedding
#[derive(Debug, Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            text.matches("strcpy").count() as f64,
            text.matches("strncpy").count() as f64,
            text.matches("kfree").count() as f64,
            1.0,
        ])
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Always fails, like an unreachable service
#[derive(Debug, Default)]
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f64>, EmbeddingError> {
        Err(EmbeddingError::Http {
            status: 503,
            body: "service unavailable".into(),
        })
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }
}

pub fn record(id: &str, cve: &str, cwe: &str, before: &str, after: &str) -> CorpusRecord {
    CorpusRecord {
        entry_id: id.into(),
        instance_id: Some(format!("{cve}_1")),
        cve_id: cve.into(),
        cwe_id: cwe.into(),
        code_before_change: before.into(),
        code_after_change: after.into(),
        vuln_cpg: None,
        patch_cpg: None,
        metadata: VulnerabilityMetadata::default(),
    }
}

/// Two-entry corpus: a stack overflow and a use after free
pub fn small_corpus() -> Vec<CorpusRecord> {
    let mut overflow = record("e1", "CVE-2021-0001", "CWE-787", OVERFLOW_BEFORE, OVERFLOW_AFTER);
    overflow.metadata.vulnerability_type = Some("stack buffer overflow".into());
    overflow.metadata.trigger_condition = Some("source longer than 16 bytes".into());
    overflow.metadata.solution = Some("Add a bounds check before copying".into());

    let mut uaf = record("e2", "CVE-2021-0002", "CWE-416", UAF_BEFORE, UAF_AFTER);
    uaf.metadata.solution = Some("Clear the pointer to avoid use after free".into());

    vec![overflow, uaf]
}

pub fn lexical_extractor() -> HybridFeatureExtractor {
    HybridFeatureExtractor::with_text_strategy(Box::new(LexicalStrategy::new()))
}

/// Build artifacts for `records` into `dir` with the keyword embedder
pub fn build_index_dir(dir: &Path, records: &[CorpusRecord]) {
    IndexBuilder::with_extractor(lexical_extractor(), KeywordEmbedder::default())
        .build_to_dir(records, dir)
        .expect("index build");
}
