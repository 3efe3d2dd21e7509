//! Fixed word lists, word splitting and keyword normalization.

use unicode_segmentation::UnicodeSegmentation;

use crate::model::AttributeKind;

/// Markers that turn a question into a forecast question. Multi-word markers
/// must appear as consecutive words.
pub const TEMPORAL_MARKERS: &[&[&str]] = &[
    &["tomorrow"],
    &["tonight"],
    &["this", "weekend"],
    &["next"],
    &["forecast"],
];

/// Words after which a place name usually follows.
pub const LOCATIVE_PREPOSITIONS: &[&str] = &["in", "for", "at", "near", "around"];

/// Lowercase words allowed inside a multi-word place name ("Rio de Janeiro").
pub const PLACE_CONNECTORS: &[&str] = &["de", "del", "da", "do", "la", "le", "los", "las", "of", "upon", "am", "sur"];

const TIME_WORDS: &[&str] = &[
    "today",
    "tomorrow",
    "tonight",
    "now",
    "currently",
    "right",
    "later",
    "weekend",
    "week",
    "morning",
    "afternoon",
    "evening",
    "night",
    "next",
    "this",
    "forecast",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "any", "are", "around", "at", "be", "been", "bring", "but", "can",
    "could", "current", "currently", "did", "do", "does", "expect", "for", "from", "get", "give",
    "going", "gonna", "hey", "hello", "here", "hi", "how", "how's", "hows", "i", "i'm", "in",
    "is", "it", "it's", "its", "know", "let", "like", "look", "looking", "me", "much", "my",
    "near", "need", "of", "on", "or", "outside", "please", "right", "say", "should", "show",
    "so", "some", "tell", "than", "that", "the", "there", "to", "today", "up", "us", "very",
    "want", "was", "we", "weather", "were", "what", "what's", "whats", "when", "where", "will",
    "with", "would", "you", "your",
];

const SUFFIX_RULES: &[(&str, &str)] = &[
    ("iest", "y"),
    ("ier", "y"),
    ("ies", "y"),
    ("ing", ""),
    ("ing", "e"),
    ("est", ""),
    ("er", ""),
    ("ed", ""),
    ("ed", "e"),
    ("es", ""),
    ("s", ""),
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

pub fn is_time_word(word: &str) -> bool {
    TIME_WORDS.contains(&word)
}

pub fn is_locative(word: &str) -> bool {
    LOCATIVE_PREPOSITIONS.contains(&word)
}

pub fn is_connector(word: &str) -> bool {
    PLACE_CONNECTORS.contains(&word)
}

fn is_known(word: &str) -> bool {
    AttributeKind::from_keyword(word).is_some() || is_time_word(word)
}

/// Words of `text` with their byte offsets, split at Unicode word boundaries.
///
/// This is the only word splitter: the language model and the intent resolver
/// both go through it. Apostrophes and dots inside a word keep it whole
/// ("what's", "St.Louis"); hyphens split it ("Saint-Denis").
pub fn word_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.unicode_word_indices()
}

/// Lowercase words of `text`, see [`word_spans`].
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    word_spans(text).map(|(_, w)| w.to_lowercase().replace('’', "'"))
}

/// Lowercase `word` and drop a trailing possessive.
pub fn fold(word: &str) -> String {
    let lower = word.to_lowercase().replace('’', "'");
    match lower.strip_suffix("'s") {
        Some(base) => base.to_string(),
        None => lower,
    }
}

/// Reduce an inflected word to its keyword base form.
///
/// Suffix rules are only accepted when they land on a known keyword or time
/// word; anything else comes back folded, see [`fold`].
pub fn normalize(word: &str) -> String {
    let folded = fold(word);
    let base = folded.as_str();

    if is_known(base) {
        return base.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        let Some(stem) = base.strip_suffix(suffix) else {
            continue;
        };
        if stem.chars().count() < 2 {
            continue;
        }

        let candidate = format!("{stem}{replacement}");
        if is_known(&candidate) {
            return candidate;
        }

        // hotter -> hot, foggiest handled by the "iest" rule above
        if replacement.is_empty() {
            if let Some(undoubled) = undouble(stem) {
                if is_known(undoubled) {
                    return undoubled.to_string();
                }
            }
        }
    }

    base.to_string()
}

/// Whether the word sequence contains any forecast marker.
pub fn has_temporal_marker(words: &[String]) -> bool {
    TEMPORAL_MARKERS.iter().any(|marker| {
        words
            .windows(marker.len())
            .any(|window| window.iter().zip(marker.iter()).all(|(w, m)| w == m))
    })
}

fn undouble(stem: &str) -> Option<&str> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let before = chars.next()?;
    if last == before && !"aeiou".contains(last) {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}
