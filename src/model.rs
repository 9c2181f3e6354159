//! Linear one-vs-rest multiclass model.
//!
//! Parameters come from an externally trained linear classifier: one weight
//! row and one bias per class. Scoring is `z_k = <x, W_k> + b_k`; the
//! predicted class is the argmax over scores, with ties broken toward the
//! lowest class index so prediction is deterministic.

use serde::Serialize;

use crate::error::{Error, Result};

/// Immutable, validated model parameters.
#[derive(Debug, Clone)]
pub struct ModelParameters {
    /// Per-class weight rows, `weights[k][j]` for class `k`, feature `j`.
    pub weights: Vec<Vec<f64>>,
    /// Per-class intercepts.
    pub biases: Vec<f64>,
    /// Human-readable class labels, aligned with the weight rows.
    pub class_labels: Vec<String>,
}

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub class_index: usize,
    pub label: String,
    pub scores: Vec<f64>,
}

impl ModelParameters {
    /// Validate and build model parameters.
    ///
    /// All weight rows must share one dimension, and weights, biases and
    /// labels must agree on the class count.
    pub fn new(
        weights: Vec<Vec<f64>>,
        biases: Vec<f64>,
        class_labels: Vec<String>,
    ) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::DimensionMismatch {
                context: "model class count",
                expected: 1,
                actual: 0,
            });
        }
        if biases.len() != weights.len() {
            return Err(Error::DimensionMismatch {
                context: "model biases",
                expected: weights.len(),
                actual: biases.len(),
            });
        }
        if class_labels.len() != weights.len() {
            return Err(Error::DimensionMismatch {
                context: "model class labels",
                expected: weights.len(),
                actual: class_labels.len(),
            });
        }
        let dim = weights[0].len();
        for row in &weights {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    context: "model weight row",
                    expected: dim,
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            weights,
            biases,
            class_labels,
        })
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.weights.len()
    }

    /// Feature dimension the model expects.
    pub fn dimension(&self) -> usize {
        self.weights[0].len()
    }

    /// Plaintext affine scores for one feature vector.
    pub fn score(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.dimension() {
            return Err(Error::DimensionMismatch {
                context: "model scoring",
                expected: self.dimension(),
                actual: x.len(),
            });
        }
        Ok(self
            .weights
            .iter()
            .zip(&self.biases)
            .map(|(row, b)| dot(x, row) + b)
            .collect())
    }

    /// Argmax over a score vector, ties toward the lowest index.
    pub fn predict_from_scores(&self, scores: &[f64]) -> Result<Prediction> {
        if scores.len() != self.num_classes() {
            return Err(Error::DimensionMismatch {
                context: "prediction scores",
                expected: self.num_classes(),
                actual: scores.len(),
            });
        }
        let mut best = 0;
        for (k, &z) in scores.iter().enumerate().skip(1) {
            // Strictly greater: equal scores keep the earlier class.
            if z > scores[best] {
                best = k;
            }
        }
        Ok(Prediction {
            class_index: best,
            label: self.class_labels[best].clone(),
            scores: scores.to_vec(),
        })
    }

    /// Score and predict in one step.
    pub fn predict(&self, x: &[f64]) -> Result<Prediction> {
        let scores = self.score(x)?;
        self.predict_from_scores(&scores)
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
