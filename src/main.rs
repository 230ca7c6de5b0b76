use std::io::Read;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use cpe_risk::cli::{Cli, Commands, PredictArgs, ServeArgs};
use cpe_risk::ctx::ServiceCtx;
use cpe_risk::io::{self, json_writer};
use cpe_risk::scores::risk;
use cpe_risk::server::{self, ApiError, payload};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args)?,
        Commands::Validate(args) => {
            let ctx = ServiceCtx::load(&args.load_options())?;
            print!("{}", io::summary::format_summary(&ctx));
        }
        Commands::Features(args) => {
            let ctx = ServiceCtx::load(&args.load_options())?;
            let doc = json_writer::build_features_response(&ctx);
            io::write_json_pretty(std::io::stdout().lock(), &doc)?;
        }
        Commands::Predict(args) => predict(args)?,
    }

    Ok(())
}

fn serve(args: ServeArgs) -> Result<()> {
    let ctx = ServiceCtx::load(&args.load_options())?;
    let cfg = args.server_cfg();
    actix_web::rt::System::new().block_on(server::run(ctx, &cfg))
}

fn predict(args: PredictArgs) -> Result<()> {
    let ctx = ServiceCtx::load(&args.model.load_options())?;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read payload from stdin")?;
            buf
        }
    };
    let value: Value = serde_json::from_str(&text).context("payload is not valid JSON")?;
    let Value::Object(map) = value else {
        bail!("{}", ApiError::InvalidPayload);
    };

    let prediction = risk::score_payload(&ctx, &payload::from_json_object(map));
    let doc = json_writer::build_predict_response(&prediction);
    io::write_json_pretty(std::io::stdout().lock(), &doc)?;
    Ok(())
}
