//! XLM-RoBERTa encoder on candle
//!
//! Loads `config.json`, `tokenizer.json` and `model.safetensors` either from
//! a local directory or from the Hugging Face hub.

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaModel};
use std::path::{Path, PathBuf};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::Encoder;
use crate::artifacts;
use crate::config::EncoderConfig;
use crate::error::{Result, SpamError};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Weight prefixes tried in order: bare `AutoModel` exports, then
/// checkpoints saved with a task head
const BACKBONE_PREFIXES: [&str; 2] = ["", "roberta"];

/// Paths of the three encoder artifacts
#[derive(Debug, Clone)]
pub struct EncoderFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl EncoderFiles {
    /// Artifacts in a local model directory
    pub fn in_dir(dir: &Path) -> Result<Self> {
        let files = Self {
            config: dir.join(CONFIG_FILE),
            tokenizer: dir.join(TOKENIZER_FILE),
            weights: dir.join(WEIGHTS_FILE),
        };

        for path in [&files.config, &files.tokenizer, &files.weights] {
            if !path.exists() {
                return Err(SpamError::Config(format!(
                    "Encoder artifact not found: {}",
                    path.display()
                )));
            }
        }
        Ok(files)
    }

    /// Artifacts from the hub cache, downloading them if needed
    pub fn from_hub(repo: &str, revision: &str) -> Result<Self> {
        let paths = artifacts::fetch_files(repo, revision, &[CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE])?;
        match paths.as_slice() {
            [config, tokenizer, weights] => Ok(Self {
                config: config.clone(),
                tokenizer: tokenizer.clone(),
                weights: weights.clone(),
            }),
            _ => Err(SpamError::ArtifactFetch {
                artifact: repo.to_string(),
                reason: format!("expected 3 files, got {}", paths.len()),
            }),
        }
    }
}

/// XLM-RoBERTa encoder returning the `<s>` (CLS) hidden state
pub struct XlmRobertaEncoder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    model_name: String,
}

impl XlmRobertaEncoder {
    /// Load the encoder described by the configuration
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        let (files, model_name) = match &config.model_dir {
            Some(dir) => (EncoderFiles::in_dir(dir)?, dir.display().to_string()),
            None => (
                EncoderFiles::from_hub(&config.repo, &config.revision)?,
                config.repo.clone(),
            ),
        };
        let device = get_device(&config.device)?;

        Self::load(&files, config.max_length, device, model_name)
    }

    /// Load from explicit artifact paths
    pub fn load(
        files: &EncoderFiles,
        max_length: usize,
        device: Device,
        model_name: String,
    ) -> Result<Self> {
        let config_str = std::fs::read_to_string(&files.config)?;
        let model_config: Config = serde_json::from_str(&config_str)?;

        let tokenizer = load_tokenizer(&files.tokenizer, max_length, model_config.pad_token_id)?;

        // Tensors from mmaped safetensors are plain constants; no gradients are tracked.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, &device)?
        };
        let model = load_backbone(&vb, &model_config)?;

        info!(
            "Loaded XLM-RoBERTa '{}' ({} layers, hidden size {}, max {} tokens)",
            model_name, model_config.num_hidden_layers, model_config.hidden_size, max_length
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: model_config.hidden_size,
            model_name,
        })
    }
}

impl Encoder for XlmRobertaEncoder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self.tokenizer.encode_batch(texts.to_vec(), true)?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;
        debug!("Encoder input shape: {:?}", input_ids.shape());

        let hidden_states = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;

        // (batch, seq, hidden) -> (batch, hidden) at position 0
        let cls = hidden_states.i((.., 0))?.to_dtype(DType::F32)?;
        Ok(cls.to_vec2::<f32>()?)
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn get_device(device: &str) -> Result<Device> {
    match device {
        "cuda" => Ok(Device::new_cuda(0)?),
        _ => Ok(Device::Cpu),
    }
}

fn load_tokenizer(path: &Path, max_length: usize, fallback_pad_id: u32) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)?;

    let pad_token = "<pad>".to_string();
    let pad_id = tokenizer.token_to_id(&pad_token).unwrap_or(fallback_pad_id);

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        pad_id,
        pad_token,
        ..Default::default()
    }));
    tokenizer.with_truncation(Some(TruncationParams {
        max_length,
        ..Default::default()
    }))?;

    Ok(tokenizer)
}

fn load_backbone(vb: &VarBuilder, config: &Config) -> Result<XLMRobertaModel> {
    let mut errors = Vec::new();

    for prefix in BACKBONE_PREFIXES {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match XLMRobertaModel::new(config, vb_prefix) {
            Ok(model) => {
                debug!("Loaded XLM-RoBERTa backbone from '{}'", display_prefix(prefix));
                return Ok(model);
            }
            Err(e) => errors.push(format!("{}: {}", display_prefix(prefix), e)),
        }
    }

    Err(SpamError::Config(format!(
        "Failed to load XLM-RoBERTa weights with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() {
        "<root>"
    } else {
        prefix
    }
}
