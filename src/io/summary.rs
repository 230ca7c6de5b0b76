use crate::ctx::ServiceCtx;

pub fn format_summary(ctx: &ServiceCtx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let artifact = &ctx.artifact;

    let mut out = String::new();
    out.push_str(&format!("cpe-risk v{}\n", version));
    out.push_str(&format!(
        "Model: {}, {} features, threshold={}\n",
        artifact.model.kind(),
        artifact.schema.len(),
        artifact.threshold
    ));
    out.push_str(&format!("Aliases: {}\n", ctx.mapper.aliases().len()));

    let unresolved: Vec<String> = ctx
        .mapper
        .unresolved(&artifact.schema)
        .into_iter()
        .map(|a| a.key.clone())
        .collect();
    if unresolved.is_empty() {
        out.push_str("Unresolved aliases: none\n");
    } else {
        out.push_str(&format!("Unresolved aliases: {}\n", unresolved.join(", ")));
    }

    out
}
