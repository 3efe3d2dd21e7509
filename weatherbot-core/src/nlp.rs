//! Linguistic analysis used by the extractor.
//!
//! The model is built once at startup and shared read-only between queries;
//! callers pass it in explicitly instead of reaching for a global.

use std::fmt::Debug;

pub mod lexicon;
mod lexicon_model;

pub use lexicon_model::LexiconModel;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    ProperNoun,
    Word,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Lowercase normalized form, see [`lexicon::normalize`].
    pub lemma: String,
    /// Byte offsets into the analyzed text.
    pub start: usize,
    pub end: usize,
    pub pos: Pos,
}

impl Token {
    /// Whether `next` follows with only whitespace, an abbreviation dot or a
    /// hyphen between ("St. Louis", "Saint-Denis").
    pub fn adjoins(&self, next: &Token, text: &str) -> bool {
        text.get(self.end..next.start)
            .is_some_and(|gap| gap.chars().all(|c| c.is_whitespace() || c == '.' || c == '-'))
    }
}

/// A geographic entity recognized by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    /// In reading order, non-overlapping.
    pub places: Vec<Place>,
}

pub trait LanguageModel: Send + Sync + Debug {
    fn analyze(&self, text: &str) -> Analysis;
}
