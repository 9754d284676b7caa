//! Opaque model handles and the JSON-backed linear pipeline that ships with
//! the service.
//!
//! A pipeline artifact looks like:
//!
//! ```json
//! {
//!   "link": "logistic",
//!   "trained_at": "2024-11-02T10:00:00Z",
//!   "intercept": 0.31,
//!   "categorical": { "batting_team": { "India": 0.42, "Pakistan": 0.1 } },
//!   "numeric": { "runs_left": { "mean": 120.0, "scale": 60.0, "weight": -1.8 } }
//! }
//! ```
//!
//! Categorical columns are one-hot encoded against the categories seen at
//! training time; numeric columns are standardised before weighting.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::cricket::{FeatureRecord, FeatureValue};

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("feature '{0}' missing from input row")]
    MissingFeature(String),

    #[error("category '{value}' for column '{column}' was not seen at training time")]
    UnknownCategory { column: String, value: String },

    #[error("column '{column}' expected a {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("model produced a non-finite output")]
    NonFinite,
}

/// Binary classifier over a chase state.
pub trait WinClassifier: Send + Sync {
    /// Class probabilities in training order: (bowling side wins, batting side wins).
    fn predict_proba(&self, record: &FeatureRecord) -> Result<(f64, f64), ModelError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Regressor projecting a first-innings total.
pub trait ScoreRegressor: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, ModelError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    Logistic,
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub mean: f64,
    pub scale: f64,
    pub weight: f64,
}

/// Linear model over one-hot categoricals and standardised numerics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPipeline {
    pub link: Link,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    pub intercept: f64,
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub numeric: BTreeMap<String, NumericTerm>,
    #[serde(skip)]
    name: String,
}

impl LinearPipeline {
    /// Load a pipeline artifact and check it carries the expected link.
    pub fn load(path: &Path, expected: Link) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let mut pipeline = Self::from_json(&data, expected)
            .with_context(|| format!("Invalid model artifact {}", path.display()))?;
        pipeline.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pipeline".to_string());
        Ok(pipeline)
    }

    pub fn from_json(data: &str, expected: Link) -> Result<Self> {
        let mut pipeline: LinearPipeline = serde_json::from_str(data)?;
        anyhow::ensure!(
            pipeline.link == expected,
            "artifact has {:?} link, expected {:?}",
            pipeline.link,
            expected
        );
        anyhow::ensure!(pipeline.intercept.is_finite(), "intercept is not finite");
        for (column, term) in &pipeline.numeric {
            anyhow::ensure!(
                term.mean.is_finite() && term.weight.is_finite(),
                "numeric column '{}' has non-finite parameters",
                column
            );
            anyhow::ensure!(
                term.scale.is_finite() && term.scale > 0.0,
                "numeric column '{}' needs a positive scale",
                column
            );
        }
        pipeline.name = "pipeline".to_string();
        Ok(pipeline)
    }

    pub fn column_count(&self) -> usize {
        self.categorical.len() + self.numeric.len()
    }

    /// Linear predictor before the link function.
    fn decision(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        let mut z = self.intercept;

        for (column, weights) in &self.categorical {
            let value = match record.get(column) {
                Some(FeatureValue::Categorical(v)) => v,
                Some(FeatureValue::Numeric(_)) => {
                    return Err(ModelError::TypeMismatch {
                        column: column.clone(),
                        expected: "categorical",
                    })
                }
                None => return Err(ModelError::MissingFeature(column.clone())),
            };
            z += weights
                .get(value)
                .ok_or_else(|| ModelError::UnknownCategory {
                    column: column.clone(),
                    value: value.clone(),
                })?;
        }

        for (column, term) in &self.numeric {
            let x = match record.get(column) {
                Some(FeatureValue::Numeric(x)) => *x,
                Some(FeatureValue::Categorical(_)) => {
                    return Err(ModelError::TypeMismatch {
                        column: column.clone(),
                        expected: "numeric",
                    })
                }
                None => return Err(ModelError::MissingFeature(column.clone())),
            };
            z += term.weight * (x - term.mean) / term.scale;
        }

        if z.is_finite() {
            Ok(z)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}

impl WinClassifier for LinearPipeline {
    fn predict_proba(&self, record: &FeatureRecord) -> Result<(f64, f64), ModelError> {
        let p = sigmoid(self.decision(record)?);
        Ok((1.0 - p, p))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ScoreRegressor for LinearPipeline {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        self.decision(record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
