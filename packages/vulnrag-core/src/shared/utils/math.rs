//! Numeric helpers shared by feature extraction and retrieval

use crate::shared::constants::retrieval::NORMALIZATION_EPSILON;

/// `numerator / denominator`, or 0 when the denominator is 0.
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Shannon entropy (base 2) of a frequency distribution.
///
/// H = log2(N) − Σ cᵢ·log2(cᵢ) / N
///
/// The rearranged form gives exact results for the two common shapes: a
/// single repeated value yields 0 and k values seen once each yield log2(k).
pub fn shannon_entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    if counts.len() <= 1 {
        return 0.0;
    }
    let total: usize = counts.iter().sum();
    let total_f = total as f64;
    let weighted: f64 = counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            c * c.log2()
        })
        .sum();
    (total_f.log2() - weighted / total_f).max(0.0)
}

/// Min-max normalization to [0,1].
///
/// `(x − min) / (max − min)`, clipped to [0,1]. A vector whose range is below
/// [`NORMALIZATION_EPSILON`] (including empty and single-element vectors)
/// normalizes to all zeros.
pub fn min_max_normalize(scores: &[f64]) -> Vec<f64> {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    let range = max - min;
    if !(range >= NORMALIZATION_EPSILON) || !range.is_finite() {
        return vec![0.0; scores.len()];
    }

    scores
        .iter()
        .map(|&x| ((x - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// Dot product over the common prefix of two slices.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity
///
/// cos(A, B) = (A · B) / (||A|| * ||B||)
///
/// Unclamped, in [-1, 1]. Returns 0 for mismatched lengths or a zero-norm
/// operand.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}
