use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ctx::LoadOptions;
use crate::server::ServerCfg;

#[derive(Debug, Parser)]
#[command(name = "cpe-risk", version, about = "CPE colonization risk prediction service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the prediction API over HTTP
    Serve(ServeArgs),
    /// Load the model artifact and print a summary
    Validate(ModelArgs),
    /// Print feature schema, aliases and threshold as JSON
    Features(ModelArgs),
    /// Score one JSON payload and print the response document
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    #[arg(
        long,
        env = "CPE_MODEL",
        default_value = "cpe_model.json",
        help = "Model artifact (JSON, optionally .gz)"
    )]
    pub model: PathBuf,

    #[arg(long, help = "Alias override TSV (short_key<TAB>feature name)")]
    pub aliases: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, env = "CPE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CPE_PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long, help = "HTML page served at GET /")]
    pub index: Option<PathBuf>,

    #[arg(long, help = "Number of HTTP workers (default: one per core)")]
    pub workers: Option<usize>,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, help = "JSON payload file (stdin when omitted)")]
    pub input: Option<PathBuf>,
}

impl ModelArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            model_path: self.model.clone(),
            aliases_path: self.aliases.clone(),
            index_path: None,
        }
    }
}

impl ServeArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            index_path: self.index.clone(),
            ..self.model.load_options()
        }
    }

    pub fn server_cfg(&self) -> ServerCfg {
        ServerCfg {
            host: self.host.clone(),
            port: self.port,
            workers: self.workers,
        }
    }
}
