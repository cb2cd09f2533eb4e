//! Lexicon-backed linguistic pipeline
//!
//! The lexicon is a tab-separated `form<TAB>lemma` file. Forms are matched
//! case-insensitively. Words missing from the lexicon go through an optional
//! Snowball stemmer, otherwise their lowercase form is the lemma.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

use super::tokenize::{segment, SegmentKind};
use super::{LinguisticPipeline, Token};
use crate::artifacts;
use crate::config::NormalizerConfig;
use crate::error::{Result, SpamError};

/// Form → lemma table
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    /// Parse lexicon text
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split('\t');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(form), Some(lemma), None) if !form.is_empty() && !lemma.is_empty() => {
                    entries.insert(form.to_lowercase(), lemma.trim().to_string());
                }
                _ => {
                    return Err(SpamError::Lexicon(format!(
                        "line {}: expected 'form<TAB>lemma', got '{}'",
                        line_no + 1,
                        line
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Load a lexicon file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamError::Lexicon(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load the configured lexicon, fetching it once from the hub if the
    /// local copy cannot be loaded
    pub fn load_or_fetch(config: &NormalizerConfig) -> Result<Self> {
        match Self::load(&config.lexicon_path) {
            Ok(lexicon) => Ok(lexicon),
            Err(e) => {
                let Some(fetch) = &config.fetch else {
                    error!("Failed to load lexicon: {}", e);
                    return Err(e);
                };

                warn!("Failed to load lexicon ({}), fetching {}/{}", e, fetch.repo, fetch.file);
                let path = artifacts::fetch_file(&fetch.repo, &fetch.revision, &fetch.file)?;
                Self::load(&path)
            }
        }
    }

    /// Look up the lemma of a form
    pub fn lemma(&self, form: &str) -> Option<&str> {
        self.entries.get(&form.to_lowercase()).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Linguistic pipeline backed by a [`Lexicon`] and an optional stemmer
pub struct LexiconPipeline {
    lexicon: Lexicon,
    stemmer: Option<Stemmer>,
    name: String,
}

impl LexiconPipeline {
    /// Create a pipeline
    pub fn new(lexicon: Lexicon, stemmer: Option<Algorithm>) -> Self {
        let name = if stemmer.is_some() {
            "lexicon+snowball".to_string()
        } else {
            "lexicon".to_string()
        };

        Self {
            lexicon,
            stemmer: stemmer.map(Stemmer::create),
            name,
        }
    }

    /// Build the pipeline from configuration
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let algorithm = super::stemmer_algorithm(&config.stemmer)?;
        let lexicon = Lexicon::load_or_fetch(config)?;

        info!("Loaded lexicon with {} entries", lexicon.len());
        let stemmed = algorithm.is_some();
        let mut pipeline = Self::new(lexicon, algorithm);
        if stemmed {
            pipeline.name = format!("lexicon+{}", config.stemmer.to_lowercase());
        }
        Ok(pipeline)
    }

    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.lexicon.lemma(word) {
            return lemma.to_string();
        }

        let lower = word.to_lowercase();
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(&lower).into_owned(),
            None => lower,
        }
    }
}

impl LinguisticPipeline for LexiconPipeline {
    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        Ok(segment(text)
            .into_iter()
            .map(|seg| match seg.kind {
                SegmentKind::Word => Token {
                    text: seg.text.to_string(),
                    lemma: self.lemmatize(seg.text),
                    is_punct: false,
                    is_space: false,
                },
                SegmentKind::Punct => Token {
                    text: seg.text.to_string(),
                    lemma: seg.text.to_string(),
                    is_punct: true,
                    is_space: false,
                },
                SegmentKind::Space => Token {
                    text: seg.text.to_string(),
                    lemma: seg.text.to_string(),
                    is_punct: false,
                    is_space: true,
                },
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
