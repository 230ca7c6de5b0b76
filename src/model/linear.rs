use anyhow::{Result, bail};

use crate::model::{Classifier, clamp_probability, sigmoid};

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64, n_features: usize) -> Result<Self> {
        if coefficients.len() != n_features {
            bail!(
                "expected {} coefficients (one per feature), got {}",
                n_features,
                coefficients.len()
            );
        }
        if let Some(i) = coefficients.iter().position(|c| !c.is_finite()) {
            bail!("coefficient {} is not finite", i);
        }
        if !intercept.is_finite() {
            bail!("intercept is not finite");
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (c, x)| acc + c * x)
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        clamp_probability(sigmoid(self.decision_function(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_row_gives_sigmoid_of_intercept() {
        let model = LogisticRegression::new(vec![0.5, -1.0], 0.0, 2).unwrap();
        assert!((model.predict_proba(&[0.0, 0.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn weighted_sum() {
        let model = LogisticRegression::new(vec![0.5, -1.0], 0.25, 2).unwrap();
        assert!((model.decision_function(&[4.0, 1.0]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn coefficient_count_must_match() {
        assert!(LogisticRegression::new(vec![1.0], 0.0, 2).is_err());
    }

    #[test]
    fn non_finite_weights_rejected() {
        assert!(LogisticRegression::new(vec![f64::NAN], 0.0, 1).is_err());
        assert!(LogisticRegression::new(vec![1.0], f64::INFINITY, 1).is_err());
    }
}
