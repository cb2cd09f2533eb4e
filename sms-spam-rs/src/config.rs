//! Configuration for sms-spam-rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SpamError};

/// Prefix for environment overrides, e.g. `SMS_SPAM__SERVER__LISTEN_ADDR`
pub const ENV_PREFIX: &str = "SMS_SPAM";

/// Main service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Text normalization (lemma lexicon and stemmer)
    pub normalizer: NormalizerConfig,
    /// Transformer encoder
    pub encoder: EncoderConfig,
    /// Pretrained SVM
    pub classifier: ClassifierConfig,
    /// Feature-importance chart
    pub visualizer: VisualizerConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8000")
    pub listen_addr: String,
}

/// Text normalizer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Path to the `form<TAB>lemma` lexicon
    pub lexicon_path: PathBuf,
    /// Snowball stemmer applied to words missing from the lexicon ("none" disables)
    pub stemmer: String,
    /// Where to fetch the lexicon from when it cannot be loaded locally
    pub fetch: Option<FetchConfig>,
}

/// Remote artifact on the Hugging Face hub
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Repository id (e.g., "org/tl-lemmas")
    pub repo: String,
    /// File inside the repository
    pub file: String,
    /// Git revision
    #[serde(default = "default_revision")]
    pub revision: String,
}

/// Encoder backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncoderBackend {
    /// XLM-RoBERTa via candle
    XlmRoberta,
    /// Deterministic hash embeddings, no model files needed
    Mock,
}

/// Encoder configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Which encoder implementation to use
    pub backend: EncoderBackend,
    /// Local directory with config.json, tokenizer.json and model.safetensors
    pub model_dir: Option<PathBuf>,
    /// Hub repository used when `model_dir` is not set
    pub repo: String,
    /// Hub revision
    pub revision: String,
    /// Maximum number of tokens per input
    pub max_length: usize,
    /// Embedding size of the mock backend
    pub hidden_size: usize,
    /// "cpu" or "cuda"
    pub device: String,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path to the exported SVM (JSON)
    pub model_path: PathBuf,
}

/// Chart configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// TTF/OTF font used for the title and labels
    pub font_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

fn default_revision() -> String {
    "main".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            lexicon_path: PathBuf::from("models/lexicon.tsv"),
            stemmer: "none".to_string(),
            fetch: None,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            backend: EncoderBackend::XlmRoberta,
            model_dir: None,
            repo: "xlm-roberta-base".to_string(),
            revision: default_revision(),
            max_length: 128,
            hidden_size: 768,
            device: "cpu".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/svm_model.json"),
        }
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            font_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SpamError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from an optional TOML file, then apply
    /// `SMS_SPAM__SECTION__KEY` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layered(&Self::default(), path)
    }

    /// Same as [`ServiceConfig::load`], starting from `base` instead of the
    /// defaults
    pub fn load_layered(base: &ServiceConfig, path: Option<&Path>) -> Result<Self> {
        Self::layer(base, path, environment())
    }

    fn layer(
        base: &ServiceConfig,
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self> {
        let base = config::Config::try_from(base)
            .map_err(|e| SpamError::Config(format!("Invalid base config: {}", e)))?;
        let mut builder = config::Config::builder().add_source(base);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<ServiceConfig>())
            .map_err(|e| SpamError::Config(format!("Failed to load config: {}", e)))
    }

    /// Configuration for local runs and tests: mock encoder, so only the
    /// lexicon and classifier files are needed. Never chosen implicitly.
    pub fn development() -> Self {
        Self {
            encoder: EncoderConfig {
                backend: EncoderBackend::Mock,
                ..EncoderConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(SpamError::Config(format!(
                "Invalid listen address '{}'",
                self.server.listen_addr
            )));
        }

        if self.normalizer.lexicon_path.as_os_str().is_empty() {
            return Err(SpamError::Config("normalizer.lexicon_path is empty".to_string()));
        }

        crate::normalizer::stemmer_algorithm(&self.normalizer.stemmer)?;

        if self.encoder.max_length == 0 {
            return Err(SpamError::Config("encoder.max_length must be positive".to_string()));
        }

        if self.encoder.backend == EncoderBackend::Mock && self.encoder.hidden_size == 0 {
            return Err(SpamError::Config("encoder.hidden_size must be positive".to_string()));
        }

        if !matches!(self.encoder.device.as_str(), "cpu" | "cuda") {
            return Err(SpamError::Config(format!(
                "Unknown encoder.device '{}'",
                self.encoder.device
            )));
        }

        if self.classifier.model_path.as_os_str().is_empty() {
            return Err(SpamError::Config("classifier.model_path is empty".to_string()));
        }

        if self.visualizer.width == 0 || self.visualizer.height == 0 {
            return Err(SpamError::Config("visualizer size must be positive".to_string()));
        }

        Ok(())
    }
}

/// `SMS_SPAM__SECTION__KEY` environment overrides
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
