//! HybridRetriever - double-index search with evidence
//!
//! ```text
//! code ─▶ HybridFeatureExtractor ─┐
//!      └▶ EmbeddingProvider ──────┴▶ QueryFeatures ─┬▶ VULN index  ─┐
//!                                                   └▶ PATCH index ─┴▶ merge ─▶ EvidenceComposer
//! ```

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{validate_weights, RetrievalConfig};
use crate::features::evidence::EvidenceComposer;
use crate::features::feature_extraction::HybridFeatureExtractor;
use crate::features::retrieval::domain::{
    best_score, FusionWeights, PatternType, QueryFeatures, RetrievalMetadata, RetrievalResult,
    RetrievalResultSet,
};
use crate::features::retrieval::error::RetrievalError;
use crate::features::retrieval::infrastructure::{load_index, JoernCpgGenerator, SimilarityIndex};
use crate::features::retrieval::ports::{CpgGenerator, EmbeddingProvider};

/// Searches the VULN and PATCH indexes with one set of query features.
///
/// Indexes are immutable after construction, so one retriever can serve
/// concurrent queries.
pub struct HybridRetriever {
    vuln: SimilarityIndex,
    patch: SimilarityIndex,
    extractor: HybridFeatureExtractor,
    embedder: Box<dyn EmbeddingProvider>,
    cpg: Option<Box<dyn CpgGenerator>>,
    weights: FusionWeights,
    composer: EvidenceComposer,
}

impl std::fmt::Debug for HybridRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridRetriever")
            .field("vuln_entries", &self.vuln.len())
            .field("patch_entries", &self.patch.len())
            .field("embedder", &self.embedder.name())
            .field("cpg", &self.cpg.is_some())
            .field("weights", &self.weights)
            .finish()
    }
}

impl HybridRetriever {
    /// Load both indexes from `dir`; a missing or inconsistent artifact is fatal
    pub fn load(dir: &Path, embedder: Box<dyn EmbeddingProvider>) -> Result<Self, RetrievalError> {
        let vuln = load_index(dir, PatternType::Vuln)?;
        let patch = load_index(dir, PatternType::Patch)?;
        Self::from_indexes(vuln, patch, embedder)
    }

    /// Retriever configured from `config`: artifacts, weights and the
    /// optional CPG generator
    pub fn from_config(
        config: &RetrievalConfig,
        embedder: Box<dyn EmbeddingProvider>,
    ) -> Result<Self, RetrievalError> {
        let retriever = Self::load(&config.artifacts_dir, embedder)?.with_weights(config.weights)?;
        if !config.cpg.enabled {
            return Ok(retriever);
        }
        let extractor = HybridFeatureExtractor::new()
            .with_cpg_timeout(Duration::from_secs(config.cpg.timeout_secs));
        Ok(retriever
            .with_extractor(extractor)
            .with_cpg_generator(Box::new(JoernCpgGenerator::from_config(&config.cpg))))
    }

    pub fn from_indexes(
        vuln: SimilarityIndex,
        patch: SimilarityIndex,
        embedder: Box<dyn EmbeddingProvider>,
    ) -> Result<Self, RetrievalError> {
        for (index, expected) in [(&vuln, PatternType::Vuln), (&patch, PatternType::Patch)] {
            if index.pattern_type() != expected {
                return Err(RetrievalError::InvalidArgument(format!(
                    "{} index passed as {expected}",
                    index.pattern_type()
                )));
            }
        }

        let (vd, pd) = (vuln.embedding_dimension(), patch.embedding_dimension());
        if !vuln.is_empty() && !patch.is_empty() && vd != pd {
            return Err(RetrievalError::InvalidArgument(format!(
                "embedding dimensions differ: VULN {vd}, PATCH {pd}"
            )));
        }

        let retriever = Self {
            vuln,
            patch,
            extractor: HybridFeatureExtractor::new(),
            embedder,
            cpg: None,
            weights: FusionWeights::default(),
            composer: EvidenceComposer::new(),
        };
        let index_dimension = retriever.embedding_dimension();
        if index_dimension != retriever.embedder.dimension() {
            warn!(
                provider = retriever.embedder.name(),
                provider_dimension = retriever.embedder.dimension(),
                index_dimension,
                "embedding provider and index disagree, queries will run without embeddings"
            );
        }
        info!(
            vuln = retriever.vuln.len(),
            patch = retriever.patch.len(),
            text_strategy = %retriever.extractor.text_strategy(),
            "retriever ready"
        );
        Ok(retriever)
    }

    /// Replace the fusion weights; each in [0,1] and summing to 1.0
    pub fn with_weights(mut self, weights: FusionWeights) -> Result<Self, RetrievalError> {
        validate_weights(&weights).map_err(|e| RetrievalError::InvalidArgument(e.to_string()))?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_cpg_generator(mut self, generator: Box<dyn CpgGenerator>) -> Self {
        self.cpg = Some(generator);
        self
    }

    pub fn with_extractor(mut self, extractor: HybridFeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    pub fn index(&self, pattern_type: PatternType) -> &SimilarityIndex {
        match pattern_type {
            PatternType::Vuln => &self.vuln,
            PatternType::Patch => &self.patch,
        }
    }

    /// Dimension query embeddings must have: the indexes', or the
    /// provider's when both indexes are empty
    pub fn embedding_dimension(&self) -> usize {
        [&self.vuln, &self.patch]
            .into_iter()
            .find(|index| !index.is_empty())
            .map_or_else(|| self.embedder.dimension(), |index| index.embedding_dimension())
    }

    /// Extract query features once. Embedding failures degrade to a zero vector.
    pub fn query_features(&self, code: &str) -> QueryFeatures {
        let features = self.extractor.extract_query(code, self.cpg.as_deref());
        if features.metadata.is_flat {
            warn!(strategy = %features.metadata.strategy, "query graph is flat, ranking anyway");
        }

        let dimension = self.embedding_dimension();
        let (embedding, degraded) = match self.embedder.embed(code) {
            Ok(vector) if vector.len() == dimension => (vector, false),
            Ok(vector) => {
                warn!(
                    provider = self.embedder.name(),
                    found = vector.len(),
                    expected = dimension,
                    "query embedding has wrong dimension, using zeros"
                );
                (vec![0.0; dimension], true)
            }
            Err(e) => {
                warn!(provider = self.embedder.name(), error = %e, "query embedding failed, using zeros");
                (vec![0.0; dimension], true)
            }
        };
        QueryFeatures::new(&features, embedding, degraded)
    }

    /// Top `top_k` entries of one index
    pub fn search(
        &self,
        pattern_type: PatternType,
        query: &QueryFeatures,
        top_k: usize,
    ) -> Vec<RetrievalResult> {
        self.index(pattern_type).search(query, &self.weights, top_k)
    }

    /// Search both indexes and compose evidence
    pub fn hybrid_retrieval(
        &self,
        code: &str,
        top_k: usize,
    ) -> Result<RetrievalResultSet, RetrievalError> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidArgument("top_k must be at least 1".into()));
        }
        let start = Instant::now();
        let query_id = Uuid::new_v4().to_string();

        let query = self.query_features(code);
        let vuln = self.search(PatternType::Vuln, &query, top_k);
        let patch = self.search(PatternType::Patch, &query, top_k);

        let best_vuln_score = best_score(&vuln);
        let best_patch_score = best_score(&patch);
        let evidence = self.composer.build(&vuln, &patch);

        let mut results: Vec<RetrievalResult> = vuln.into_iter().chain(patch).collect();
        results.sort_by(|a, b| b.hybrid_score.total_cmp(&a.hybrid_score));

        let search_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            query_id = %query_id,
            results = results.len(),
            best_vuln_score,
            best_patch_score,
            search_time_ms,
            "hybrid retrieval done"
        );

        Ok(RetrievalResultSet {
            query_id,
            results,
            best_vuln_score,
            best_patch_score,
            evidence_for: evidence.evidence_for,
            evidence_against: evidence.evidence_against,
            differential_analysis: evidence.differential_analysis,
            retrieval_metadata: RetrievalMetadata {
                search_time_ms,
                total_vuln_patterns: self.vuln.len(),
                total_patch_patterns: self.patch.len(),
                weights: self.weights,
                query_strategy: query.strategy,
                query_quality_score: query.quality_score,
                query_is_flat: query.is_flat,
                embedding_degraded: query.embedding_degraded,
            },
        })
    }
}
