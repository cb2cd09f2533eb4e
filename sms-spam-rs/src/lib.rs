//! sms-spam-rs: SMS spam classification service
//!
//! Classifies an SMS as SPAM or HAM from its text and sender, and returns a
//! feature-importance chart alongside the label.
//!
//! # Pipeline
//!
//! 1. Normalize the message into lowercase lemmas ([`normalizer`])
//! 2. Embed it with XLM-RoBERTa, keeping the CLS state ([`embedding`])
//! 3. Derive two sender flags and append them ([`features`])
//! 4. Run the pretrained SVM ([`classifier`])
//! 5. Render the feature chart as base64 PNG ([`visualizer`])
//!
//! All artifacts are loaded once into a [`ServiceContext`] and served over
//! `POST /predict` ([`api`]).
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:8000"
//!
//! [normalizer]
//! lexicon_path = "models/lexicon.tsv"
//! stemmer = "none"
//!
//! [encoder]
//! backend = "xlm-roberta"
//! model_dir = "models/xlm-roberta-base"
//! max_length = 128
//!
//! [classifier]
//! model_path = "models/svm_model.json"
//!
//! [visualizer]
//! font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//! ```

pub mod api;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod embedding;
pub mod error;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod visualizer;

pub use classifier::{Prediction, SvmClassifier};
pub use config::ServiceConfig;
pub use error::{Result, SpamError};
pub use pipeline::{PredictRequest, PredictResponse, ServiceContext};
