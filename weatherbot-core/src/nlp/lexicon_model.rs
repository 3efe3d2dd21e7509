use std::collections::HashSet;

use super::{Analysis, LanguageModel, Place, Pos, Token, lexicon};
use crate::model::AttributeKind;

const BUILTIN_PLACES: &str = include_str!("places.txt");

/// Rule-based tagger backed by a gazetteer of place names.
#[derive(Debug)]
pub struct LexiconModel {
    places: HashSet<String>,
    longest_place: usize,
}

impl LexiconModel {
    /// Build the model from the embedded gazetteer plus `extra_places`.
    pub fn load(extra_places: &[String]) -> Self {
        let builtin = BUILTIN_PLACES
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let places: HashSet<String> = builtin
            .chain(extra_places.iter().map(String::as_str))
            .map(place_key)
            .filter(|key| !key.is_empty())
            .collect();

        let longest_place = places.iter().map(|p| p.split(' ').count()).max().unwrap_or(1);

        tracing::debug!(places = places.len(), longest_place, "language model loaded");

        Self { places, longest_place }
    }

    pub fn builtin() -> Self {
        Self::load(&[])
    }

    pub fn knows_place(&self, name: &str) -> bool {
        self.places.contains(&place_key(name))
    }

    fn find_places(&self, text: &str, tokens: &[Token]) -> Vec<Place> {
        let mut places = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            // Lowercase names only count after "in"/"for"/... or at the start
            // of a sentence: mid-sentence "turkey" is usually not the country.
            let after_locative = i > 0 && lexicon::is_locative(&tokens[i - 1].lemma);
            let prev = i.checked_sub(1).map(|p| &tokens[p]);
            let eligible = after_locative
                || starts_uppercase(&tokens[i].text)
                || opens_sentence(text, prev, tokens[i].start);

            match self.longest_match(text, tokens, i).filter(|_| eligible) {
                Some(len) => {
                    let (start, end) = (tokens[i].start, tokens[i + len - 1].end);
                    places.push(Place { text: text[start..end].to_string(), start, end });
                    i += len;
                }
                None => i += 1,
            }
        }

        places
    }

    fn longest_match(&self, text: &str, tokens: &[Token], first: usize) -> Option<usize> {
        let mut key = String::new();
        let mut best = None;

        for len in 1..=self.longest_place {
            let Some(token) = tokens.get(first + len - 1) else {
                break;
            };
            if len > 1 {
                if !tokens[first + len - 2].adjoins(token, text) {
                    break;
                }
                key.push(' ');
            }
            key.push_str(&place_key(&token.text));

            if self.places.contains(&key) {
                best = Some(len);
            }
        }

        best
    }
}

impl LanguageModel for LexiconModel {
    fn analyze(&self, text: &str) -> Analysis {
        let tokens = tokenize(text);
        let places = self.find_places(text, &tokens);
        Analysis { tokens, places }
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (start, surface) in lexicon::word_spans(text) {
        let end = start + surface.len();
        let folded = lexicon::fold(surface);
        let lemma = lexicon::normalize(surface);

        // Mid-sentence capitals are names unless the word itself is known:
        // "Mount Rainier" is not rainy. A sentence opener may be inflected
        // ("Raining in Paris?").
        let base = if opens_sentence(text, tokens.last(), start) { &lemma } else { &folded };
        let pos = tag(surface, &folded, base);
        let lemma = if pos == Pos::ProperNoun { folded } else { lemma };

        tokens.push(Token { text: surface.to_string(), lemma, start, end, pos });
    }

    tokens
}

/// Whether a word starting at `start` opens a sentence, given the word before it.
fn opens_sentence(text: &str, prev: Option<&Token>, start: usize) -> bool {
    prev.is_none_or(|prev| {
        text.get(prev.end..start).is_some_and(|gap| gap.contains(['.', '?', '!']))
    })
}

fn tag(surface: &str, folded: &str, base: &str) -> Pos {
    if surface.starts_with(|c: char| c.is_numeric()) {
        return Pos::Number;
    }

    let function_word = lexicon::is_stop_word(folded)
        || lexicon::is_stop_word(base)
        || lexicon::is_time_word(base)
        || AttributeKind::from_keyword(base).is_some();

    if starts_uppercase(surface) && !function_word { Pos::ProperNoun } else { Pos::Word }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Lookup key: folded words joined by single spaces, "St.Louis" == "st louis".
fn place_key(name: &str) -> String {
    lexicon::words(name)
        .map(|w| lexicon::fold(&w).replace('.', " "))
        .collect::<Vec<_>>()
        .join(" ")
}
