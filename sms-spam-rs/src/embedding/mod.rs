//! Sentence embeddings
//!
//! An [`Encoder`] turns normalized text into the first-position (CLS) hidden
//! state of a transformer. The real backend is XLM-RoBERTa on candle; the
//! mock backend produces deterministic vectors without any model files.

pub mod mock;
pub mod xlm_roberta;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{EncoderBackend, EncoderConfig};
use crate::error::Result;

pub use mock::MockEncoder;
pub use xlm_roberta::XlmRobertaEncoder;

/// Encoder trait
pub trait Encoder: Send + Sync {
    /// Embed a batch of texts, one vector of `hidden_size()` per input
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Length of every returned vector
    fn hidden_size(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Build the configured encoder
pub fn build_encoder(config: &EncoderConfig) -> Result<Arc<dyn Encoder>> {
    let encoder: Arc<dyn Encoder> = match config.backend {
        EncoderBackend::XlmRoberta => Arc::new(XlmRobertaEncoder::from_config(config)?),
        EncoderBackend::Mock => {
            warn!("Mock encoder selected, predictions do not reflect message content");
            Arc::new(MockEncoder::new(config.hidden_size))
        }
    };

    info!(
        "Encoder initialized: {} (hidden size {})",
        encoder.model_name(),
        encoder.hidden_size()
    );
    Ok(encoder)
}
