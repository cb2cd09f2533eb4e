//! Text normalization
//!
//! Turns a raw SMS body into a space-joined string of lowercase lemmas.
//! The linguistic analysis itself sits behind [`LinguisticPipeline`] so the
//! lexicon-backed implementation can be swapped out.

pub mod lexicon;
pub mod tokenize;

use rust_stemmers::Algorithm;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, SpamError};

pub use lexicon::{Lexicon, LexiconPipeline};

/// A token produced by a linguistic pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form as it appeared in the input
    pub text: String,
    /// Dictionary form
    pub lemma: String,
    /// Token consists of punctuation only
    pub is_punct: bool,
    /// Token consists of whitespace only
    pub is_space: bool,
}

/// Linguistic pipeline trait
pub trait LinguisticPipeline: Send + Sync {
    /// Split text into tokens and attach lemmas
    fn analyze(&self, text: &str) -> Result<Vec<Token>>;

    /// Get pipeline name
    fn name(&self) -> &str;
}

/// Lemmatizes and filters message text
pub struct TextNormalizer {
    pipeline: Arc<dyn LinguisticPipeline>,
}

impl TextNormalizer {
    /// Create a normalizer over a loaded pipeline
    pub fn new(pipeline: Arc<dyn LinguisticPipeline>) -> Self {
        Self { pipeline }
    }

    /// Name of the underlying pipeline
    pub fn pipeline_name(&self) -> &str {
        self.pipeline.name()
    }

    /// Normalize a message.
    ///
    /// Keeps alphabetic, non-punctuation, non-whitespace lemmas, lowercased
    /// and joined by single spaces. Falls back to the lowercased input when
    /// no token survives.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let tokens = self.pipeline.analyze(text)?;

        let lemmas: Vec<String> = tokens
            .iter()
            .filter(|t| !t.is_punct && !t.is_space && is_alpha(&t.lemma))
            .map(|t| t.lemma.to_lowercase())
            .collect();

        if lemmas.is_empty() {
            debug!("No lemma survived filtering, using lowercased input");
            return Ok(text.to_lowercase());
        }

        Ok(lemmas.join(" "))
    }
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Resolve a configured stemmer name ("none" disables stemming)
pub fn stemmer_algorithm(name: &str) -> Result<Option<Algorithm>> {
    let algorithm = match name.to_lowercase().as_str() {
        "" | "none" => return Ok(None),
        "arabic" => Algorithm::Arabic,
        "danish" => Algorithm::Danish,
        "dutch" => Algorithm::Dutch,
        "english" => Algorithm::English,
        "finnish" => Algorithm::Finnish,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "greek" => Algorithm::Greek,
        "hungarian" => Algorithm::Hungarian,
        "italian" => Algorithm::Italian,
        "norwegian" => Algorithm::Norwegian,
        "portuguese" => Algorithm::Portuguese,
        "romanian" => Algorithm::Romanian,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        "tamil" => Algorithm::Tamil,
        "turkish" => Algorithm::Turkish,
        other => {
            return Err(SpamError::Config(format!("Unknown stemmer '{}'", other)));
        }
    };
    Ok(Some(algorithm))
}
