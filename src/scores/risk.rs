use tracing::debug;

use crate::ctx::ServiceCtx;
use crate::features::{FeatureRow, Payload};
use crate::scores::Prediction;

pub fn build_row<'a>(ctx: &'a ServiceCtx, payload: &Payload) -> FeatureRow<'a> {
    ctx.mapper.build_row(&ctx.artifact.schema, payload)
}

pub fn score_payload(ctx: &ServiceCtx, payload: &Payload) -> Prediction {
    let row = build_row(ctx, payload);
    score_row(ctx, &row)
}

pub fn score_row(ctx: &ServiceCtx, row: &FeatureRow<'_>) -> Prediction {
    let probability = ctx.artifact.predict_proba(&row.to_f64());
    let prediction = Prediction::new(probability, ctx.artifact.threshold);
    debug!(
        probability = prediction.probability,
        threshold = prediction.threshold,
        positive = prediction.decision.is_positive(),
        "prediction"
    );
    prediction
}
