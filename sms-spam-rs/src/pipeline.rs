//! Prediction pipeline
//!
//! [`ServiceContext`] owns the three pretrained artifacts plus the chart
//! renderer. It is built once at startup and never mutated; request handlers
//! share it through an `Arc`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::classifier::{Prediction, SvmClassifier};
use crate::config::ServiceConfig;
use crate::embedding::{build_encoder, Encoder};
use crate::error::{Result, SpamError};
use crate::features::{FeatureVector, SenderFeatures, SENDER_FEATURE_COUNT};
use crate::normalizer::{LexiconPipeline, TextNormalizer};
use crate::visualizer::Visualizer;

/// Prediction request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    pub sender: String,
    pub message: String,
}

/// Prediction response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictResponse {
    pub sender: String,
    pub message: String,
    /// Normalized message fed to the encoder
    pub processed: String,
    pub prediction: Prediction,
    /// Base64-encoded PNG
    pub visualization: String,
}

/// Immutable, shared inference state
pub struct ServiceContext {
    normalizer: TextNormalizer,
    encoder: Arc<dyn Encoder>,
    classifier: SvmClassifier,
    visualizer: Visualizer,
}

impl ServiceContext {
    /// Load everything the service needs, in order: linguistic pipeline,
    /// encoder and tokenizer, classifier
    pub fn initialize(config: &ServiceConfig) -> Result<Self> {
        info!("Loading linguistic pipeline from {}", config.normalizer.lexicon_path.display());
        let pipeline = LexiconPipeline::from_config(&config.normalizer)?;
        let normalizer = TextNormalizer::new(Arc::new(pipeline));

        info!("Loading encoder");
        let encoder = build_encoder(&config.encoder)?;

        info!("Loading classifier from {}", config.classifier.model_path.display());
        let classifier = SvmClassifier::load(&config.classifier.model_path)?;

        let visualizer = Visualizer::from_config(&config.visualizer)?;

        Self::new(normalizer, encoder, classifier, visualizer)
    }

    /// Assemble a context from loaded parts, checking that the classifier
    /// was trained on `hidden_size + 2` features
    pub fn new(
        normalizer: TextNormalizer,
        encoder: Arc<dyn Encoder>,
        classifier: SvmClassifier,
        visualizer: Visualizer,
    ) -> Result<Self> {
        let expected = encoder.hidden_size() + SENDER_FEATURE_COUNT;
        if classifier.dimension() != expected {
            return Err(SpamError::DimensionMismatch {
                expected,
                actual: classifier.dimension(),
            });
        }

        info!(
            "Service ready: {} -> {} -> {} SVM ({} features)",
            normalizer.pipeline_name(),
            encoder.model_name(),
            classifier.kernel_name(),
            expected
        );

        Ok(Self {
            normalizer,
            encoder,
            classifier,
            visualizer,
        })
    }

    /// Normalized text for a message
    pub fn normalize(&self, message: &str) -> Result<String> {
        self.normalizer.normalize(message)
    }

    /// Embedding, sender features and their concatenation
    pub fn features(&self, processed: &str, sender: &str) -> Result<FeatureVector> {
        let embedding = self
            .encoder
            .embed(&[processed.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| SpamError::DimensionMismatch {
                expected: self.encoder.hidden_size(),
                actual: 0,
            })?;

        Ok(FeatureVector::assemble(
            embedding,
            SenderFeatures::from_sender(sender),
        ))
    }

    /// Run the full pipeline for one request
    pub fn predict(&self, request: PredictRequest) -> Result<PredictResponse> {
        let start = Instant::now();

        let processed = self.normalize(&request.message)?;
        debug!("Processed message: {:?}", processed);

        let features = self.features(&processed, &request.sender)?;
        let prediction = self.classifier.predict(&features)?;
        let visualization = self.visualizer.render(&features, prediction)?;

        info!(
            "Predicted {} for sender of length {} in {}ms",
            prediction,
            request.sender.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(PredictResponse {
            sender: request.sender,
            message: request.message,
            processed,
            prediction,
            visualization,
        })
    }
}
