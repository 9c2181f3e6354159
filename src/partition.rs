//! Sensitivity partition of the feature index space.
//!
//! Given a fitted feature space and a set of sensitive column names, the
//! partition splits slot indices into a sensitive set (scored under
//! encryption) and a plain set (scored in cleartext). Matching is by
//! substring: a slot is sensitive when its name contains any sensitive
//! column name. This deliberately over-matches (a sensitive column `"age"`
//! also captures `"age_group"` slots); erring toward encrypting more is the
//! safe direction, so the rule is left permissive.

use log::info;

use crate::error::{Error, Result};
use crate::feature_space::FeatureSpace;

/// Disjoint, complete split of slot indices `0..dimension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureIndexPartition {
    /// Indices scored under encryption, ascending.
    pub sensitive: Vec<usize>,
    /// Indices scored in plaintext, ascending.
    pub plain: Vec<usize>,
    /// Dimension of the feature space the partition was computed against.
    pub dimension: usize,
}

impl FeatureIndexPartition {
    /// Compute the partition for a fitted feature space.
    pub fn from_feature_space<S: AsRef<str>>(
        space: &FeatureSpace,
        sensitive_columns: &[S],
    ) -> Result<Self> {
        if space.dimension() == 0 {
            return Err(Error::EmptyFeatureSpace);
        }

        let mut sensitive = Vec::new();
        let mut plain = Vec::new();
        for (idx, name) in space.slot_names().iter().enumerate() {
            let is_sensitive = sensitive_columns
                .iter()
                .any(|col| name.contains(col.as_ref()));
            if is_sensitive {
                sensitive.push(idx);
            } else {
                plain.push(idx);
            }
        }
        info!(
            "sensitivity partition: {} encrypted slots, {} plaintext slots",
            sensitive.len(),
            plain.len()
        );

        Ok(Self {
            sensitive,
            plain,
            dimension: space.dimension(),
        })
    }

    /// Project a feature vector onto its (sensitive, plain) sub-vectors,
    /// each in ascending index order.
    pub fn split(&self, x: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        if x.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                context: "partition split",
                expected: self.dimension,
                actual: x.len(),
            });
        }
        let gather = |indices: &[usize]| indices.iter().map(|&i| x[i]).collect::<Vec<f64>>();
        Ok((gather(&self.sensitive), gather(&self.plain)))
    }
}
