//! Per-column standardization of structural vectors

use serde::{Deserialize, Serialize};

/// z = (x − mean) / scale, with population standard deviation as scale and
/// constant columns left unscaled (scale 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Identity scaler of `dimension` columns
    pub fn identity(dimension: usize) -> Self {
        Self {
            mean: vec![0.0; dimension],
            scale: vec![1.0; dimension],
        }
    }

    /// Fit column statistics; an empty matrix yields the identity
    pub fn fit(rows: &[Vec<f64>], dimension: usize) -> Self {
        if rows.is_empty() {
            return Self::identity(dimension);
        }
        let n = rows.len() as f64;

        let mut mean = vec![0.0; dimension];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0; dimension];
        for row in rows {
            for ((v, x), m) in variance.iter_mut().zip(row).zip(&mean) {
                *v += (x - m).powi(2);
            }
        }

        let scale = variance
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std < 10.0 * f64::EPSILON || !std.is_finite() {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Self { mean, scale }
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.mean.len() == self.scale.len()
            && self.mean.iter().all(|m| m.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && *s > 0.0)
    }
}
