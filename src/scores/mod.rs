pub mod risk;

pub const POSITIVE_LABEL: &str = "CPE positive";
pub const NEGATIVE_LABEL: &str = "CPE negative";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Positive,
    Negative,
}

impl Decision {
    /// Positive when `probability >= threshold`.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Positive => POSITIVE_LABEL,
            Self::Negative => NEGATIVE_LABEL,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub probability: f64,
    pub threshold: f64,
    pub decision: Decision,
}

impl Prediction {
    pub fn new(probability: f64, threshold: f64) -> Self {
        Self {
            probability,
            threshold,
            decision: Decision::from_probability(probability, threshold),
        }
    }

    pub fn percent(&self) -> f64 {
        round_percent(self.probability)
    }
}

/// Probability in [0, 1] as a percentage with one decimal place.
///
/// Rounds the exact binary value with ties to even, so `0.3125` shows as
/// `31.2`.
pub fn round_percent(probability: f64) -> f64 {
    let pct = probability * 100.0;
    format!("{:.1}", pct).parse().unwrap_or(pct)
}
