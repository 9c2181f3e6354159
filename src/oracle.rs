//! Consistency oracle: hybrid-vs-plaintext score comparison.
//!
//! The encryption layer is approximate, so hybrid scores drift from their
//! plaintext references by a small amount. The oracle quantifies that drift
//! per class and can enforce a tolerance, turning excess drift into
//! [`Error::ToleranceExceeded`]. It is a validation tool, not part of the
//! inference path.

use log::{info, warn};
use serde::Serialize;

use crate::error::{Error, Result};

/// Default absolute tolerance for score drift.
pub const DEFAULT_TOLERANCE: f64 = 1e-2;

/// Per-class drift record.
#[derive(Debug, Clone, Serialize)]
pub struct ClassDrift {
    pub label: String,
    pub plaintext: f64,
    pub hybrid: f64,
    pub drift: f64,
}

/// Full comparison outcome, serializable for audit logs.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub classes: Vec<ClassDrift>,
    pub max_drift: f64,
    pub tolerance: f64,
    pub within_tolerance: bool,
}

impl ConsistencyReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Compares hybrid scores against plaintext references.
#[derive(Debug, Clone)]
pub struct ConsistencyOracle {
    pub tolerance: f64,
}

impl Default for ConsistencyOracle {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ConsistencyOracle {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Build the per-class drift report. The three slices must align.
    pub fn compare(
        &self,
        labels: &[String],
        plaintext: &[f64],
        hybrid: &[f64],
    ) -> Result<ConsistencyReport> {
        if plaintext.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                context: "oracle plaintext scores",
                expected: labels.len(),
                actual: plaintext.len(),
            });
        }
        if hybrid.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                context: "oracle hybrid scores",
                expected: labels.len(),
                actual: hybrid.len(),
            });
        }

        let classes: Vec<ClassDrift> = labels
            .iter()
            .zip(plaintext.iter().zip(hybrid))
            .map(|(label, (&p, &h))| ClassDrift {
                label: label.clone(),
                plaintext: p,
                hybrid: h,
                drift: (h - p).abs(),
            })
            .collect();
        let max_drift = classes.iter().map(|c| c.drift).fold(0.0, f64::max);
        let within_tolerance = max_drift <= self.tolerance;

        if within_tolerance {
            info!(
                "consistency check passed: max drift {:.3e} <= tolerance {:.3e}",
                max_drift, self.tolerance
            );
        } else {
            warn!(
                "consistency check failed: max drift {:.3e} > tolerance {:.3e}",
                max_drift, self.tolerance
            );
        }

        Ok(ConsistencyReport {
            classes,
            max_drift,
            tolerance: self.tolerance,
            within_tolerance,
        })
    }

    /// Compare and enforce: the worst offending class becomes the error.
    pub fn verify(
        &self,
        labels: &[String],
        plaintext: &[f64],
        hybrid: &[f64],
    ) -> Result<ConsistencyReport> {
        let report = self.compare(labels, plaintext, hybrid)?;
        if !report.within_tolerance {
            let worst = report
                .classes
                .iter()
                .max_by(|a, b| a.drift.total_cmp(&b.drift))
                .ok_or(Error::DimensionMismatch {
                    context: "oracle class count",
                    expected: 1,
                    actual: 0,
                })?;
            return Err(Error::ToleranceExceeded {
                class: worst.label.clone(),
                drift: worst.drift,
                tolerance: self.tolerance,
            });
        }
        Ok(report)
    }
}
