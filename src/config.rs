use crate::constants::{DEFAULT_BUILD_CONCURRENCY, DEFAULT_TOP_K, MODEL_PATH, VECTOR_SIZE};
use crate::encoder::{BertEncoder, HashingEncoder, TextEncoder};
use anyhow::Result as AnyhowResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Deterministic feature hashing, no model files needed
    #[default]
    Hashing,
    /// Local BERT sentence encoder (MiniLM)
    Bert,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub encoder: EncoderKind,
    pub model_path: PathBuf,
    pub hashing_dimension: usize,
    pub default_top_k: usize,
    pub build_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoder: EncoderKind::default(),
            model_path: PathBuf::from(MODEL_PATH),
            hashing_dimension: VECTOR_SIZE,
            default_top_k: DEFAULT_TOP_K,
            build_concurrency: DEFAULT_BUILD_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_top_k == 0 {
            return Err("default_top_k must be at least 1".to_string());
        }
        if self.build_concurrency == 0 {
            return Err("build_concurrency must be at least 1".to_string());
        }
        if self.encoder == EncoderKind::Hashing && self.hashing_dimension == 0 {
            return Err("hashing_dimension must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn from_yaml_str(source: &str) -> AnyhowResult<Self> {
        let config: Config = serde_yaml::from_str(source)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> AnyhowResult<Self> {
        let f = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(f)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Constructs the configured encoder. Loading the BERT model happens here.
    pub fn create_encoder(&self) -> AnyhowResult<Box<dyn TextEncoder>> {
        Ok(match self.encoder {
            EncoderKind::Hashing => Box::new(HashingEncoder::new(self.hashing_dimension)?),
            EncoderKind::Bert => Box::new(BertEncoder::load(&self.model_path)?),
        })
    }
}
