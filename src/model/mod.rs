//! Inference objects that turn one feature row into a positive-class probability.
//!
//! Models are described by [`ModelSpec`] (the serialized form stored in the
//! artifact) and validated into a boxed [`Classifier`] against the feature
//! schema before any request is served.

pub mod linear;
pub mod trees;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::linear::LogisticRegression;
use crate::model::trees::{GradientBoosting, RandomForest, TreeSpec};

pub trait Classifier: Send + Sync {
    fn kind(&self) -> &'static str;
    fn n_features(&self) -> usize;
    /// `row` has exactly `n_features()` columns; the result lies in [0, 1].
    fn predict_proba(&self, row: &[f64]) -> f64;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    GradientBoosting {
        #[serde(default)]
        base_score: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        trees: Vec<TreeSpec>,
    },
    RandomForest {
        trees: Vec<TreeSpec>,
    },
}

fn default_learning_rate() -> f64 {
    1.0
}

impl ModelSpec {
    pub fn build(self, n_features: usize) -> Result<Box<dyn Classifier>> {
        let model: Box<dyn Classifier> = match self {
            ModelSpec::LogisticRegression {
                coefficients,
                intercept,
            } => Box::new(
                LogisticRegression::new(coefficients, intercept, n_features)
                    .context("invalid logistic_regression model")?,
            ),
            ModelSpec::GradientBoosting {
                base_score,
                learning_rate,
                trees,
            } => Box::new(
                GradientBoosting::new(base_score, learning_rate, trees, n_features)
                    .context("invalid gradient_boosting model")?,
            ),
            ModelSpec::RandomForest { trees } => Box::new(
                RandomForest::new(trees, n_features).context("invalid random_forest model")?,
            ),
        };
        Ok(model)
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
