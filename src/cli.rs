use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{Config, EncoderKind};
use crate::constants::CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "api-matcher",
    about = "Match natural language queries to API operations",
    long_about = "Indexes the operations of an OpenAPI-style document (JSON or YAML) and ranks them \
                  against natural language queries by embedding similarity. \
                  Without --query, runs a few sample queries.",
    version
)]
pub struct Args {
    /// API document to index
    #[arg(short, long, help = "Path to the API document (.json, .yaml or .yml)")]
    pub spec: PathBuf,

    /// Queries to match
    #[arg(
        short,
        long,
        help = "Natural language query to match (repeatable)",
        action = ArgAction::Append
    )]
    pub query: Vec<String>,

    #[arg(short = 'k', long, help = "Number of matches to return per query")]
    pub top_k: Option<usize>,

    #[arg(
        short,
        long,
        help = "YAML configuration file (defaults to matcher.yaml when present)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Encoder used to embed operations and queries")]
    pub encoder: Option<EncoderKind>,

    #[arg(long, help = "Directory holding the BERT model files")]
    pub model_path: Option<PathBuf>,

    #[arg(long, help = "Print results as JSON", action = ArgAction::SetTrue)]
    pub json: bool,

    #[arg(long, help = "Enable debug logging", action = ArgAction::SetTrue)]
    pub debug: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

impl Args {
    /// Loads the configuration file, if any, and applies command-line overrides.
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_yaml(path)?,
            None if std::path::Path::new(CONFIG_PATH).exists() => {
                Config::load_from_yaml(CONFIG_PATH)?
            }
            None => Config::default(),
        };

        if let Some(encoder) = self.encoder {
            config.encoder = encoder;
        }
        if let Some(model_path) = &self.model_path {
            config.model_path = model_path.clone();
        }
        if let Some(top_k) = self.top_k {
            config.default_top_k = top_k;
        }

        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }
}
