//! The serialized model bundle: inference object, feature schema, threshold.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

use crate::features::FeatureSchema;
use crate::io;
use crate::model::{Classifier, ModelSpec};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    model: ModelSpec,
    features: Vec<String>,
    #[serde(default)]
    threshold: Option<f64>,
}

pub struct ModelArtifact {
    pub model: Box<dyn Classifier>,
    pub schema: FeatureSchema,
    pub threshold: f64,
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("model", &self.model.kind())
            .field("features", &self.schema.len())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl ModelArtifact {
    pub fn from_parts(
        model: ModelSpec,
        features: Vec<String>,
        threshold: Option<f64>,
    ) -> Result<Self> {
        let schema = FeatureSchema::new(features).context("invalid feature list")?;
        let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            bail!("threshold {} outside [0, 1]", threshold);
        }
        let model = model.build(schema.len())?;
        if model.n_features() != schema.len() {
            bail!(
                "{} model takes {} features, artifact lists {}",
                model.kind(),
                model.n_features(),
                schema.len()
            );
        }
        Ok(Self {
            model,
            schema,
            threshold,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: ArtifactFile =
            serde_json::from_str(content).context("malformed model artifact")?;
        Self::from_parts(file.model, file.features, file.threshold)
    }

    /// Probability for a row already laid out in schema order.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.model.n_features());
        self.model.predict_proba(row)
    }
}

pub fn load_artifact(path: &Path) -> Result<ModelArtifact> {
    let content = io::read_to_string_maybe_gz(path)
        .with_context(|| format!("failed to read model artifact {}", path.display()))?;
    let artifact = ModelArtifact::from_json(&content)
        .with_context(|| format!("failed to load model artifact {}", path.display()))?;
    info!(
        artifact = %path.display(),
        model = artifact.model.kind(),
        features = artifact.schema.len(),
        threshold = artifact.threshold,
        "model_loaded"
    );
    Ok(artifact)
}
