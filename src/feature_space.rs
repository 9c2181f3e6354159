//! Feature space: fitted vectorization of clinical records.
//!
//! Fitting learns, from a set of training records, a fixed mapping from
//! heterogeneous column values to a dense feature vector. Numeric columns are
//! standardized with the mean and population standard deviation observed at
//! fit time; categorical columns expand to one-hot slots, one per category
//! observed at fit time. The slot layout is deterministic: all numeric
//! columns in sorted name order, then all categorical columns in sorted name
//! order with their categories sorted within each column. Slot names carry
//! the source column name (`"age"`, `"gender=female"`), which is what the
//! sensitivity partition matches against.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Error, Result};

/// A single cell of a clinical record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

/// One record: column name to value. BTreeMap keeps column iteration
/// deterministic.
pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone)]
struct NumericColumn {
    name: String,
    mean: f64,
    std: f64,
}

#[derive(Debug, Clone)]
struct CategoricalColumn {
    name: String,
    /// Sorted, deduplicated categories observed at fit time.
    categories: Vec<String>,
}

/// Immutable fitted feature space. Rebuilding (rather than mutating) is the
/// only way to change the layout, so a partition or model validated against
/// a space can never silently drift out of sync with it.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    numeric: Vec<NumericColumn>,
    categorical: Vec<CategoricalColumn>,
    slot_names: Vec<String>,
}

impl FeatureSpace {
    /// Fit the feature space on training records.
    ///
    /// The schema (column names and kinds) is taken from the first record;
    /// every other record must agree with it. Returns
    /// [`Error::EmptyFeatureSpace`] when no records or no columns are given.
    pub fn fit(records: &[Record]) -> Result<Self> {
        let first = records.first().ok_or(Error::EmptyFeatureSpace)?;
        if first.is_empty() {
            return Err(Error::EmptyFeatureSpace);
        }

        let mut numeric: Vec<NumericColumn> = Vec::new();
        let mut categorical: Vec<CategoricalColumn> = Vec::new();

        // BTreeMap iteration gives sorted column order for free.
        for (name, value) in first {
            match value {
                Value::Number(_) => {
                    let samples = collect_numeric(records, name)?;
                    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
                    let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                        / samples.len() as f64;
                    let std = var.sqrt();
                    numeric.push(NumericColumn {
                        name: name.clone(),
                        mean,
                        // A constant column would divide by zero; it
                        // standardizes to zero either way.
                        std: if std > 0.0 { std } else { 1.0 },
                    });
                }
                Value::Text(_) => {
                    let mut categories = BTreeSet::new();
                    for record in records {
                        match record.get(name) {
                            Some(Value::Text(t)) => {
                                categories.insert(t.clone());
                            }
                            Some(Value::Number(_)) => {
                                return Err(Error::SchemaMismatch {
                                    column: name.clone(),
                                    reason: "expected text, found number".into(),
                                })
                            }
                            None => {
                                return Err(Error::SchemaMismatch {
                                    column: name.clone(),
                                    reason: "missing in a training record".into(),
                                })
                            }
                        }
                    }
                    categorical.push(CategoricalColumn {
                        name: name.clone(),
                        categories: categories.into_iter().collect(),
                    });
                }
            }
        }

        let mut slot_names = Vec::new();
        for col in &numeric {
            slot_names.push(col.name.clone());
        }
        for col in &categorical {
            for cat in &col.categories {
                slot_names.push(format!("{}={}", col.name, cat));
            }
        }
        debug!(
            "fitted feature space: {} numeric + {} categorical columns, {} slots",
            numeric.len(),
            categorical.len(),
            slot_names.len()
        );

        Ok(Self {
            numeric,
            categorical,
            slot_names,
        })
    }

    /// Total number of feature slots.
    pub fn dimension(&self) -> usize {
        self.slot_names.len()
    }

    /// Slot names in layout order.
    pub fn slot_names(&self) -> &[String] {
        &self.slot_names
    }

    /// Map one record to its dense feature vector.
    ///
    /// Numeric values are standardized; categorical values activate their
    /// one-hot slot. A categorical value never seen at fit time activates no
    /// slot and is NOT an error. A missing column or a value of the wrong
    /// kind is a [`Error::SchemaMismatch`].
    pub fn vectorize(&self, record: &Record) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.dimension());

        for col in &self.numeric {
            match record.get(&col.name) {
                Some(Value::Number(v)) => out.push((v - col.mean) / col.std),
                Some(Value::Text(_)) => {
                    return Err(Error::SchemaMismatch {
                        column: col.name.clone(),
                        reason: "expected number, found text".into(),
                    })
                }
                None => {
                    return Err(Error::SchemaMismatch {
                        column: col.name.clone(),
                        reason: "missing numeric column".into(),
                    })
                }
            }
        }

        for col in &self.categorical {
            let text = match record.get(&col.name) {
                Some(Value::Text(t)) => t,
                Some(Value::Number(_)) => {
                    return Err(Error::SchemaMismatch {
                        column: col.name.clone(),
                        reason: "expected text, found number".into(),
                    })
                }
                None => {
                    return Err(Error::SchemaMismatch {
                        column: col.name.clone(),
                        reason: "missing categorical column".into(),
                    })
                }
            };
            for cat in &col.categories {
                out.push(if cat == text { 1.0 } else { 0.0 });
            }
        }

        Ok(out)
    }
}

fn collect_numeric(records: &[Record], name: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        match record.get(name) {
            Some(Value::Number(v)) => samples.push(*v),
            Some(Value::Text(_)) => {
                return Err(Error::SchemaMismatch {
                    column: name.to_string(),
                    reason: "expected number, found text".into(),
                })
            }
            None => {
                return Err(Error::SchemaMismatch {
                    column: name.to_string(),
                    reason: "missing in a training record".into(),
                })
            }
        }
    }
    Ok(samples)
}
