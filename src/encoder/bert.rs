use super::TextEncoder;
use anyhow::{Context, Result as AnyhowResult};
use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::{PaddingParams, Tokenizer};
use tracing::{debug, info};

#[derive(Deserialize)]
struct ModelShape {
    hidden_size: usize,
}

struct BertRuntime {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

/// Sentence encoder backed by a local BERT-family checkpoint (MiniLM by default).
///
/// The model is loaded once in [`BertEncoder::load`] and owned by the encoder;
/// inference runs on tokio's blocking pool.
#[derive(Clone)]
pub struct BertEncoder {
    runtime: Arc<BertRuntime>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P) -> AnyhowResult<Self> {
        let model_dir = model_dir.as_ref();
        info!("Loading sentence encoder from {:?}", model_dir);

        let config_path = model_dir.join("config.json");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file not found at {:?}",
                config_path
            ));
        }
        if !tokenizer_path.exists() {
            return Err(anyhow::anyhow!(
                "Tokenizer file not found at {:?}",
                tokenizer_path
            ));
        }
        let weights_path = find_weights(model_dir)?;

        let config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {:?}", config_path))?;
        let hidden_size = serde_json::from_str::<ModelShape>(&config)?.hidden_size;
        let config: Config = serde_json::from_str(&config)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let device = Device::Cpu;
        let vb = if weights_path.extension().is_some_and(|ext| ext == "safetensors") {
            let weights = std::fs::read(&weights_path)
                .with_context(|| format!("Failed to read {:?}", weights_path))?;
            VarBuilder::from_buffered_safetensors(weights, DTYPE, &device)?
        } else {
            VarBuilder::from_pth(&weights_path, DTYPE, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        if let Some(pp) = tokenizer.get_padding_mut() {
            pp.strategy = tokenizers::PaddingStrategy::BatchLongest;
        } else {
            let pp = PaddingParams {
                strategy: tokenizers::PaddingStrategy::BatchLongest,
                ..Default::default()
            };
            tokenizer.with_padding(Some(pp));
        }

        debug!(hidden_size, weights = ?weights_path, "Model loaded");

        Ok(Self {
            runtime: Arc::new(BertRuntime {
                model,
                tokenizer,
                device,
            }),
            hidden_size,
        })
    }
}

// safetensors wins when both formats are present
pub(crate) fn find_weights(model_dir: &Path) -> AnyhowResult<PathBuf> {
    ["model.safetensors", "model.ot"]
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| anyhow::anyhow!("Model weights not found in {:?}", model_dir))
}

impl BertRuntime {
    fn embed(&self, sentence: &str) -> AnyhowResult<Vec<f32>> {
        let tokens = self
            .tokenizer
            .encode_batch(vec![sentence], true)
            .map_err(|e| anyhow::anyhow!("Failed to encode sentence: {}", e))?;

        let token_ids = tokens
            .iter()
            .map(|tokens| {
                let tokens = tokens.get_ids().to_vec();
                Ok(Tensor::new(tokens.as_slice(), &self.device)?)
            })
            .collect::<AnyhowResult<Vec<_>>>()
            .context("Failed to create token tensors")?;

        let token_ids = Tensor::stack(&token_ids, 0)?;
        let token_type_ids = token_ids.zeros_like()?;

        let attention_mask = tokens
            .iter()
            .map(|tokens| {
                let mask = tokens.get_attention_mask();
                Ok(Tensor::new(mask, &self.device)?)
            })
            .collect::<AnyhowResult<Vec<_>>>()
            .context("Failed to create attention masks")?;

        let attention_mask = Tensor::stack(&attention_mask, 0)?;
        let embeddings = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling, then L2 normalisation
        let (_n_sentence, n_tokens, _hidden_size) = embeddings.dims3()?;
        let embeddings = (embeddings.sum(1)? / (n_tokens as f64))?;
        let embeddings = embeddings.broadcast_div(&embeddings.sqr()?.sum_keepdim(1)?.sqrt()?)?;

        embeddings
            .to_vec2::<f32>()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Model returned no embedding for '{}'", sentence))
    }
}

#[async_trait]
impl TextEncoder for BertEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        let runtime = Arc::clone(&self.runtime);
        let sentence = text.to_string();
        tokio::task::spawn_blocking(move || runtime.embed(&sentence))
            .await
            .context("Encoder task panicked")?
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.hidden_size)
    }
}
