//! Feature extraction and assembly
//!
//! The classifier was trained on `embedding ++ [numeric_sender, short_sender]`.
//! [`FeatureVector`] and [`FeatureSchema`] keep that layout in one place.

use serde::{Deserialize, Serialize};

/// Number of sender features appended after the embedding
pub const SENDER_FEATURE_COUNT: usize = 2;

/// Senders shorter than this many characters count as short codes
pub const SHORT_SENDER_LEN: usize = 6;

/// Binary features derived from the sender string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderFeatures {
    /// Sender is non-empty and made of ASCII digits only
    pub numeric: bool,
    /// Sender has fewer than [`SHORT_SENDER_LEN`] characters
    pub short: bool,
}

impl SenderFeatures {
    /// Compute features for a sender
    pub fn from_sender(sender: &str) -> Self {
        Self {
            numeric: !sender.is_empty() && sender.chars().all(|c| c.is_ascii_digit()),
            short: sender.chars().count() < SHORT_SENDER_LEN,
        }
    }

    /// Features as `[numeric, short]`
    pub fn to_array(self) -> [f32; SENDER_FEATURE_COUNT] {
        [flag(self.numeric), flag(self.short)]
    }
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Classifier input: embedding followed by sender features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    embedding: Vec<f32>,
    sender: SenderFeatures,
}

impl FeatureVector {
    /// Assemble a feature vector
    pub fn assemble(embedding: Vec<f32>, sender: SenderFeatures) -> Self {
        Self { embedding, sender }
    }

    /// The embedding part
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// The sender part
    pub fn sender(&self) -> SenderFeatures {
        self.sender
    }

    /// Total number of features
    pub fn len(&self) -> usize {
        self.embedding.len() + SENDER_FEATURE_COUNT
    }

    /// Always false; a feature vector carries at least the sender features
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dense values in training order
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = Vec::with_capacity(self.len());
        dense.extend_from_slice(&self.embedding);
        dense.extend_from_slice(&self.sender.to_array());
        dense
    }

    /// Schema naming each dense position
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::for_hidden_size(self.embedding.len())
    }
}

/// Names of the dense feature positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    hidden_size: usize,
}

impl FeatureSchema {
    /// Schema for an encoder with the given hidden size
    pub fn for_hidden_size(hidden_size: usize) -> Self {
        Self { hidden_size }
    }

    /// Total number of features
    pub fn len(&self) -> usize {
        self.hidden_size + SENDER_FEATURE_COUNT
    }

    /// Always false, see [`FeatureVector::is_empty`]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Display label for a dense position
    pub fn label(&self, index: usize) -> String {
        match index.checked_sub(self.hidden_size) {
            None => format!("Embedding Dim {}", index + 1),
            Some(0) => "Numeric Sender".to_string(),
            Some(1) => "Short Sender".to_string(),
            Some(_) => format!("Feature {}", index + 1),
        }
    }

    /// Labels for all positions
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_features_numeric_short() {
        let f = SenderFeatures::from_sender("12345");
        assert_eq!(f.to_array(), [1.0, 1.0]);
    }

    #[test]
    fn test_sender_features_name() {
        let f = SenderFeatures::from_sender("JohnSmith");
        assert_eq!(f.to_array(), [0.0, 0.0]);
    }

    #[test]
    fn test_sender_features_edges() {
        // long numeric sender
        assert_eq!(SenderFeatures::from_sender("09171234567").to_array(), [1.0, 0.0]);
        // short alphanumeric code
        assert_eq!(SenderFeatures::from_sender("GCash").to_array(), [0.0, 1.0]);
        // exactly six characters is not short
        assert_eq!(SenderFeatures::from_sender("123456").to_array(), [1.0, 0.0]);
        // empty sender is short but not numeric
        assert_eq!(SenderFeatures::from_sender("").to_array(), [0.0, 1.0]);
        // "+63" prefix is not a digit
        assert!(!SenderFeatures::from_sender("+639171234567").numeric);
        // length counts characters, not bytes
        assert!(SenderFeatures::from_sender("ñañañ").short);
        // numerals that are not digits
        assert!(!SenderFeatures::from_sender("½").numeric);
        assert!(!SenderFeatures::from_sender("Ⅻ").numeric);
        assert!(!SenderFeatures::from_sender("12½").numeric);
    }

    #[test]
    fn test_feature_vector_order() {
        let v = FeatureVector::assemble(vec![0.5, -0.25, 2.0], SenderFeatures::from_sender("12345"));
        assert_eq!(v.len(), 5);
        assert_eq!(v.to_dense(), vec![0.5, -0.25, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_schema_labels() {
        let schema = FeatureSchema::for_hidden_size(3);
        assert_eq!(
            schema.labels(),
            vec![
                "Embedding Dim 1",
                "Embedding Dim 2",
                "Embedding Dim 3",
                "Numeric Sender",
                "Short Sender",
            ]
        );
    }

    #[test]
    fn test_schema_matches_vector() {
        let v = FeatureVector::assemble(vec![0.0; 768], SenderFeatures::from_sender("x"));
        assert_eq!(v.schema().len(), 770);
        assert_eq!(v.schema().len(), v.to_dense().len());
    }
}
