//! Score fusion and ranking

use serde::{Deserialize, Serialize};

use crate::shared::constants::retrieval::{
    DEFAULT_EMBEDDING_WEIGHT, DEFAULT_LEXICAL_WEIGHT, DEFAULT_STRUCTURAL_WEIGHT,
};
use crate::shared::utils::math::min_max_normalize;

/// Channel weights of the fused score; valid weights sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FusionWeights {
    pub structural: f64,
    pub lexical: f64,
    pub embedding: f64,
}

impl FusionWeights {
    pub fn new(structural: f64, lexical: f64, embedding: f64) -> Self {
        Self {
            structural,
            lexical,
            embedding,
        }
    }

    pub fn sum(&self) -> f64 {
        self.structural + self.lexical + self.embedding
    }

    /// Weighted sum of already-normalized channel scores
    #[inline]
    pub fn fuse(&self, structural: f64, lexical: f64, embedding: f64) -> f64 {
        self.structural * structural + self.lexical * lexical + self.embedding * embedding
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::new(
            DEFAULT_STRUCTURAL_WEIGHT,
            DEFAULT_LEXICAL_WEIGHT,
            DEFAULT_EMBEDDING_WEIGHT,
        )
    }
}

/// Raw per-entry cosine scores of the three channels, in corpus order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelScores {
    pub structural: Vec<f64>,
    pub lexical: Vec<f64>,
    pub embedding: Vec<f64>,
}

/// One ranked corpus position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
    /// Row in the index
    pub row: usize,
    pub fused: f64,
    pub structural: f64,
    pub lexical: f64,
    pub embedding: f64,
}

impl ChannelScores {
    pub fn len(&self) -> usize {
        self.structural.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structural.is_empty()
    }

    /// Normalize each channel independently, fuse, and keep the `top_k`
    /// best rows. Ties keep corpus order.
    pub fn rank(&self, weights: &FusionWeights, top_k: usize) -> Vec<RankedHit> {
        let structural = min_max_normalize(&self.structural);
        let lexical = min_max_normalize(&self.lexical);
        let embedding = min_max_normalize(&self.embedding);

        let mut hits: Vec<RankedHit> = (0..self.len())
            .map(|row| RankedHit {
                row,
                fused: weights
                    .fuse(structural[row], lexical[row], embedding[row])
                    .clamp(0.0, 1.0),
                structural: self.structural[row],
                lexical: self.lexical[row],
                embedding: self.embedding[row],
            })
            .collect();

        // stable: equal scores stay in corpus order
        hits.sort_by(|a, b| b.fused.total_cmp(&a.fused));
        hits.truncate(top_k);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = FusionWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!((w.fuse(1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_normalizes_per_channel() {
        let scores = ChannelScores {
            structural: vec![0.2, 0.8, 0.5],
            lexical: vec![0.0, 0.0, 0.0],
            embedding: vec![0.9, 0.1, 0.5],
        };
        let hits = scores.rank(&FusionWeights::default(), 3);
        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        // row1: 0.4·1 + 0 + 0.3·0 = 0.4; row0: 0 + 0.3·1 = 0.3; row2: 0.2 + 0.15 = 0.35
        assert_eq!(rows, vec![1, 2, 0]);
        assert!((hits[0].fused - 0.4).abs() < 1e-12);
        // raw scores are reported unnormalized
        assert_eq!(hits[0].structural, 0.8);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let scores = ChannelScores {
            structural: vec![0.5; 4],
            lexical: vec![0.5; 4],
            embedding: vec![0.5; 4],
        };
        let hits = scores.rank(&FusionWeights::default(), 2);
        assert_eq!(hits.iter().map(|h| h.row).collect::<Vec<_>>(), vec![0, 1]);
        assert!(hits.iter().all(|h| h.fused == 0.0));
    }

    #[test]
    fn test_empty_index() {
        assert!(ChannelScores::default().rank(&FusionWeights::default(), 10).is_empty());
    }
}
