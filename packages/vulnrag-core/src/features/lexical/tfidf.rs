//! TF-IDF vectorizer
//!
//! Weighting:
//! - tf: raw term count in the document
//! - idf: ln((1 + n) / (1 + df)) + 1 (smoothed, never zero)
//! - rows are L2-normalized
//!
//! The vocabulary is frozen at fit time; unseen query terms are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tokenizer::tokenize;

/// Sparse row: ascending term indices with matching weights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product by merging the sorted index lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity; 0 when either vector is zero
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            0.0
        } else {
            self.dot(other) / denom
        }
    }

    /// Largest index + 1 (0 for an empty vector)
    pub fn min_dimension(&self) -> usize {
        self.indices.last().map_or(0, |last| last + 1)
    }
}

/// Fitted TF-IDF model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term → column
    vocabulary: BTreeMap<String, usize>,
    /// idf per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf from a corpus.
    ///
    /// Columns are assigned in lexicographic term order.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut terms = tokenize(doc.as_ref());
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(term, column);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }
        Self { vocabulary, idf }
    }

    /// Fit and transform the same corpus
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents);
        let rows = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        (vectorizer, rows)
    }

    /// L2-normalized TF-IDF row for one document
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(document) {
            if let Some(&column) = self.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let (indices, mut values): (Vec<usize>, Vec<f64>) = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .unzip();

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        SparseVector { indices, values }
    }

    /// Number of columns
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Vocabulary columns are exactly 0..dimension and every idf is finite
    pub fn is_consistent(&self) -> bool {
        let mut columns: Vec<usize> = self.vocabulary.values().copied().collect();
        columns.sort_unstable();
        columns.len() == self.idf.len()
            && columns.iter().enumerate().all(|(i, &c)| i == c)
            && self.idf.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_fit_vocabulary_and_idf() {
        let docs = ["strcpy buf buf", "memcpy buf"];
        let v = TfidfVectorizer::fit(&docs);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.vocabulary()["buf"], 0);
        assert_eq!(v.vocabulary()["memcpy"], 1);
        assert_eq!(v.vocabulary()["strcpy"], 2);
        // buf in both docs: ln(3/3) + 1
        assert!((v.idf()[0] - 1.0).abs() < EPS);
        // strcpy in one: ln(3/2) + 1
        assert!((v.idf()[2] - ((1.5f64).ln() + 1.0)).abs() < EPS);
        assert!(v.is_consistent());
    }

    #[test]
    fn test_transform_is_unit_length() {
        let (v, rows) = TfidfVectorizer::fit_transform(&["strcpy buf buf", "memcpy buf"]);
        for row in &rows {
            assert!((row.norm() - 1.0).abs() < EPS);
        }
        assert!((rows[0].cosine(&rows[0]) - 1.0).abs() < EPS);
        assert!(v.transform("unseen words only").is_empty());
    }

    #[test]
    fn test_identical_text_is_most_similar() {
        let docs = ["strcpy dst src", "kfree obj", "mutex_lock lock"];
        let (v, rows) = TfidfVectorizer::fit_transform(&docs);
        let query = v.transform("kfree obj");
        let scores: Vec<f64> = rows.iter().map(|r| query.cosine(r)).collect();
        assert!((scores[1] - 1.0).abs() < EPS);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn test_sparse_dot_merges_indices() {
        let a = SparseVector { indices: vec![0, 2, 5], values: vec![1.0, 2.0, 3.0] };
        let b = SparseVector { indices: vec![2, 3, 5], values: vec![4.0, 9.0, 1.0] };
        assert!((a.dot(&b) - 11.0).abs() < EPS);
        assert_eq!(a.min_dimension(), 6);
        assert_eq!(SparseVector::default().cosine(&a), 0.0);
    }
}
