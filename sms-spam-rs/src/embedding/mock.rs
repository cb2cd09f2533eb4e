//! Mock encoder for development and testing
//!
//! Hashes each word into a fixed-size vector. Same input, same output, no
//! model files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::Encoder;
use crate::error::Result;

/// Mock encoder implementation
pub struct MockEncoder {
    hidden_size: usize,
    model_name: String,
}

impl MockEncoder {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            hidden_size,
            model_name: format!("mock-encoder-{}", hidden_size),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.hidden_size];
        if self.hidden_size == 0 {
            return vector;
        }

        for word in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let h = hasher.finish();

            let slot = (h % self.hidden_size as u64) as usize;
            // upper 32 bits mapped to [-1, 1]
            let weight = (h >> 32) as f32 / u32::MAX as f32 * 2.0 - 1.0;
            vector[slot] += weight;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Encoder for MockEncoder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_shape() {
        let encoder = MockEncoder::new(16);
        let out = encoder
            .embed(&["free money now".to_string(), "".to_string()])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.len() == 16));
        assert!(out[1].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mock_deterministic() {
        let encoder = MockEncoder::new(32);
        let a = encoder.embed(&["meeting tomorrow".to_string()]).unwrap();
        let b = encoder.embed(&["meeting tomorrow".to_string()]).unwrap();
        assert_eq!(a, b);

        let norm: f32 = a[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
