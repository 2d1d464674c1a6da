//! One searchable index (VULN or PATCH)
//!
//! ```text
//! entries[i] ─┬─ structural[i]  (scaled, 12 columns)
//!             ├─ tfidf_rows[i]  (L2-normalized sparse row)
//!             └─ embeddings[i]  (dense, provider dimension)
//! ```

use crate::features::lexical::{SparseVector, TfidfVectorizer};
use crate::features::retrieval::domain::{
    ChannelScores, FusionWeights, IndexEntry, PatternType, QueryFeatures, RetrievalResult,
};
use crate::features::retrieval::infrastructure::scaler::StandardScaler;
use crate::shared::constants::features::STRUCTURAL_DIMENSIONS;
use crate::shared::utils::math::cosine_similarity;

/// Immutable per-pattern index
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    pub(crate) pattern_type: PatternType,
    pub(crate) entries: Vec<IndexEntry>,
    pub(crate) structural: Vec<Vec<f64>>,
    pub(crate) scaler: StandardScaler,
    pub(crate) tfidf: TfidfVectorizer,
    pub(crate) tfidf_rows: Vec<SparseVector>,
    pub(crate) embeddings: Vec<Vec<f64>>,
}

impl SimilarityIndex {
    /// Assemble an index from its parts, checking that they agree.
    ///
    /// Returns a description of the first inconsistency found.
    pub fn from_parts(
        pattern_type: PatternType,
        entries: Vec<IndexEntry>,
        structural: Vec<Vec<f64>>,
        scaler: StandardScaler,
        tfidf: TfidfVectorizer,
        tfidf_rows: Vec<SparseVector>,
        embeddings: Vec<Vec<f64>>,
    ) -> Result<Self, String> {
        let index = Self {
            pattern_type,
            entries,
            structural,
            scaler,
            tfidf,
            tfidf_rows,
            embeddings,
        };
        index.check()?;
        Ok(index)
    }

    fn check(&self) -> Result<(), String> {
        let n = self.entries.len();
        if let Some(entry) = self.entries.iter().find(|e| e.pattern_type != self.pattern_type) {
            return Err(format!(
                "entry {} is {} in the {} index",
                entry.entry_id, entry.pattern_type, self.pattern_type
            ));
        }
        for (name, rows) in [
            ("structural", self.structural.len()),
            ("tfidf", self.tfidf_rows.len()),
            ("embedding", self.embeddings.len()),
        ] {
            if rows != n {
                return Err(format!("{name} matrix has {rows} rows for {n} entries"));
            }
        }
        if let Some(row) = self.structural.iter().find(|r| r.len() != STRUCTURAL_DIMENSIONS) {
            return Err(format!(
                "structural row has {} columns, expected {STRUCTURAL_DIMENSIONS}",
                row.len()
            ));
        }
        if self.scaler.dimension() != STRUCTURAL_DIMENSIONS || !self.scaler.is_consistent() {
            return Err(format!(
                "scaler has {} columns, expected {STRUCTURAL_DIMENSIONS}",
                self.scaler.dimension()
            ));
        }
        if !self.tfidf.is_consistent() {
            return Err("tfidf vocabulary and idf disagree".to_string());
        }
        let vocabulary = self.tfidf.dimension();
        for row in &self.tfidf_rows {
            let sorted = row.indices.windows(2).all(|w| w[0] < w[1]);
            if row.indices.len() != row.values.len() || !sorted || row.min_dimension() > vocabulary {
                return Err(format!("tfidf row outside a vocabulary of {vocabulary} terms"));
            }
        }
        let dimension = self.embedding_dimension();
        if self.embeddings.iter().any(|r| r.len() != dimension) {
            return Err("embedding rows have different lengths".to_string());
        }
        Ok(())
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Embedding length, 0 for an empty index
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.first().map_or(0, Vec::len)
    }

    /// Raw cosine scores of all three channels
    pub fn channel_scores(&self, query: &QueryFeatures) -> ChannelScores {
        let scaled = self.scaler.transform(&query.structural);
        let tfidf_query = self.tfidf.transform(&query.combined_text);

        ChannelScores {
            structural: self
                .structural
                .iter()
                .map(|row| cosine_similarity(&scaled, row))
                .collect(),
            lexical: self
                .tfidf_rows
                .iter()
                .map(|row| tfidf_query.cosine(row))
                .collect(),
            embedding: self
                .embeddings
                .iter()
                .map(|row| cosine_similarity(&query.embedding, row))
                .collect(),
        }
    }

    /// Top `top_k` entries by fused score
    pub fn search(
        &self,
        query: &QueryFeatures,
        weights: &FusionWeights,
        top_k: usize,
    ) -> Vec<RetrievalResult> {
        self.channel_scores(query)
            .rank(weights, top_k)
            .into_iter()
            .map(|hit| {
                let entry = &self.entries[hit.row];
                RetrievalResult {
                    entry_id: entry.entry_id.clone(),
                    instance_id: entry.instance_id.clone(),
                    hybrid_score: hit.fused,
                    structural_score: hit.structural,
                    tfidf_score: hit.lexical,
                    embedding_score: hit.embedding,
                    cve_id: entry.cve_id.clone(),
                    cwe_id: entry.cwe_id.clone(),
                    pattern_type: entry.pattern_type,
                    metadata: entry.vulnerability_metadata.clone(),
                }
            })
            .collect()
    }
}
