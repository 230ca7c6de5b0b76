use crate::ctx::ServiceCtx;
use crate::schema::v1::{FeaturesResponse, PredictResponse};
use crate::scores::Prediction;

pub fn build_predict_response(prediction: &Prediction) -> PredictResponse {
    PredictResponse {
        status: prediction.decision.status().to_string(),
        probability: prediction.percent(),
        threshold: prediction.threshold,
        icon: prediction.decision.icon().to_string(),
    }
}

pub fn build_features_response(ctx: &ServiceCtx) -> FeaturesResponse {
    let aliases = ctx
        .mapper
        .aliases()
        .iter()
        .map(|a| (a.key.clone(), a.feature.clone()))
        .collect();
    FeaturesResponse {
        features: ctx.artifact.schema.names().to_vec(),
        aliases,
        threshold: ctx.artifact.threshold,
    }
}
