//! Pretrained SVM classifier
//!
//! The model is exported from training as JSON, either a linear SVM
//!
//! ```json
//! { "kernel": "linear", "weights": [0.1, -0.3], "bias": 0.05 }
//! ```
//!
//! or an RBF-kernel SVM with its support vectors:
//!
//! ```json
//! { "kernel": "rbf", "support_vectors": [[0.1, 0.2]], "dual_coef": [0.7],
//!   "intercept": -0.2, "gamma": 0.5 }
//! ```
//!
//! `coef`/`intercept` are accepted as aliases for the linear fields. An
//! optional `"classes": [neg, pos]` maps the decision sign to class labels;
//! label `1` is spam.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, SpamError};
use crate::features::FeatureVector;

/// Class label the classifier uses for spam
pub const SPAM_LABEL: i64 = 1;

/// Binary prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Spam,
    Ham,
}

impl Prediction {
    /// Map a raw class label to a prediction
    pub fn from_label(label: i64) -> Self {
        if label == SPAM_LABEL {
            Prediction::Spam
        } else {
            Prediction::Ham
        }
    }

    /// "SPAM" or "HAM"
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Spam => "SPAM",
            Prediction::Ham => "HAM",
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision function parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kernel", rename_all = "lowercase")]
pub enum SvmKernel {
    Linear {
        #[serde(alias = "coef")]
        weights: Vec<f64>,
        #[serde(alias = "intercept")]
        bias: f64,
    },
    Rbf {
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        #[serde(alias = "bias")]
        intercept: f64,
        gamma: f64,
    },
}

#[derive(Debug, Deserialize)]
struct SvmModelFile {
    #[serde(flatten)]
    kernel: SvmKernel,
    #[serde(default = "default_classes")]
    classes: [i64; 2],
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// Read-only SVM loaded at startup
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    kernel: SvmKernel,
    classes: [i64; 2],
    dimension: usize,
}

impl SvmClassifier {
    /// Build a classifier from kernel parameters
    pub fn new(kernel: SvmKernel, classes: [i64; 2]) -> Result<Self> {
        let dimension = match &kernel {
            SvmKernel::Linear { weights, .. } => {
                if weights.is_empty() {
                    return Err(SpamError::Config("Linear SVM has no weights".to_string()));
                }
                weights.len()
            }
            SvmKernel::Rbf {
                support_vectors,
                dual_coef,
                gamma,
                ..
            } => {
                let first = support_vectors.first().ok_or_else(|| {
                    SpamError::Config("RBF SVM has no support vectors".to_string())
                })?;
                if support_vectors.iter().any(|sv| sv.len() != first.len()) {
                    return Err(SpamError::Config(
                        "Support vectors have inconsistent lengths".to_string(),
                    ));
                }
                if dual_coef.len() != support_vectors.len() {
                    return Err(SpamError::Config(format!(
                        "Expected {} dual coefficients, got {}",
                        support_vectors.len(),
                        dual_coef.len()
                    )));
                }
                if !(*gamma > 0.0) {
                    return Err(SpamError::Config("RBF gamma must be positive".to_string()));
                }
                first.len()
            }
        };

        Ok(Self {
            kernel,
            classes,
            dimension,
        })
    }

    /// Parse an exported model
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SvmModelFile = serde_json::from_str(json)?;
        Self::new(file.kernel, file.classes)
    }

    /// Load an exported model from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamError::Config(format!("Failed to read classifier {}: {}", path.display(), e))
        })?;
        let classifier = Self::from_json(&content)?;

        info!(
            "Loaded {} SVM with {} features from {}",
            classifier.kernel_name(),
            classifier.dimension,
            path.display()
        );
        Ok(classifier)
    }

    /// Number of features the model was trained on
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// "linear" or "rbf"
    pub fn kernel_name(&self) -> &'static str {
        match self.kernel {
            SvmKernel::Linear { .. } => "linear",
            SvmKernel::Rbf { .. } => "rbf",
        }
    }

    /// Signed distance to the separating hyperplane
    pub fn decision_function(&self, x: &[f32]) -> Result<f64> {
        if x.len() != self.dimension {
            return Err(SpamError::DimensionMismatch {
                expected: self.dimension,
                actual: x.len(),
            });
        }

        let value = match &self.kernel {
            SvmKernel::Linear { weights, bias } => {
                weights
                    .iter()
                    .zip(x)
                    .map(|(w, &v)| w * v as f64)
                    .sum::<f64>()
                    + bias
            }
            SvmKernel::Rbf {
                support_vectors,
                dual_coef,
                intercept,
                gamma,
            } => {
                support_vectors
                    .iter()
                    .zip(dual_coef)
                    .map(|(sv, coef)| {
                        let dist2: f64 = sv
                            .iter()
                            .zip(x)
                            .map(|(s, &v)| (s - v as f64).powi(2))
                            .sum();
                        coef * (-gamma * dist2).exp()
                    })
                    .sum::<f64>()
                    + intercept
            }
        };

        Ok(value)
    }

    /// Raw class label for a dense feature vector
    pub fn predict_label(&self, x: &[f32]) -> Result<i64> {
        let decision = self.decision_function(x)?;
        Ok(if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }

    /// Classify an assembled feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        self.predict_label(&features.to_dense())
            .map(Prediction::from_label)
    }
}
