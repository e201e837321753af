//! Tokenize, stop-word filter and lemmatize

use crate::config::NormalizerConfig;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

/// Text pipeline applied to every extracted file
pub struct TextPipeline {
    stop_words: HashSet<String>,
    stemmer: Stemmer,
}

impl fmt::Debug for TextPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextPipeline")
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

impl Default for TextPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPipeline {
    /// Pipeline with the built-in English stop-word list
    pub fn new() -> Self {
        Self::with_stop_words(get(LANGUAGE::English).iter().map(|w| w.to_string()))
    }

    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        let mut pipeline = match &config.stop_words {
            Some(words) => Self::with_stop_words(words),
            None => Self::new(),
        };
        pipeline.add_stop_words(&config.extra_stop_words);
        pipeline
    }

    pub fn add_stop_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Words of `text`, stop-words dropped, each reduced to its stem, space-joined
    pub fn process(&self, text: &str) -> String {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|word| !self.stop_words.contains(word))
            .map(|word| self.stemmer.stem(&word).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
