//! Location and attribute keyword extraction.

use std::{cmp::Reverse, collections::BTreeSet};

use tracing::debug;

use crate::{
    model::AttributeKind,
    nlp::{Analysis, LanguageModel, Pos, Token, lexicon},
};

/// Longer input is cut to this many characters before analysis.
pub const MAX_INPUT_CHARS: usize = 4096;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub location: Option<String>,
    /// Normalized attribute keywords, e.g. `"windy"`, `"rain"`.
    pub keywords: BTreeSet<String>,
}

/// Find the location and the attribute keywords mentioned in `text`.
///
/// When several places are mentioned the first one in reading order wins.
pub fn extract(model: &dyn LanguageModel, text: &str) -> Extraction {
    let text = truncate_input(text);
    let analysis = model.analyze(text);

    let span = select_location(text, &analysis);

    let keywords: BTreeSet<String> = analysis
        .tokens
        .iter()
        .filter(|t| span.is_none_or(|(start, end)| t.end <= start || t.start >= end))
        .filter(|t| AttributeKind::from_keyword(&t.lemma).is_some())
        .map(|t| t.lemma.clone())
        .collect();

    let location = span.map(|(start, end)| clean_place_name(&text[start..end]));

    debug!(?location, ?keywords, "extracted question entities");

    Extraction { location, keywords }
}

fn clean_place_name(span: &str) -> String {
    let name = span.trim_end_matches('.');
    name.strip_suffix("'s")
        .or_else(|| name.strip_suffix("’s"))
        .unwrap_or(name)
        .to_string()
}

fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => {
            debug!(chars = MAX_INPUT_CHARS, "question truncated");
            &text[..idx]
        }
        None => text,
    }
}

fn select_location(text: &str, analysis: &Analysis) -> Option<(usize, usize)> {
    let tokens = &analysis.tokens;

    let gazetteer = analysis.places.iter().map(|p| (p.start, p.end));
    let proper_runs = locative_positions(tokens).filter_map(|i| {
        let (first, start) = run_start(text, tokens, i)?;
        proper_noun_run(text, tokens, first).map(|end| (start, end))
    });

    // earliest wins; on equal start prefer the longer span
    gazetteer
        .chain(proper_runs)
        .min_by_key(|&(start, end)| (start, Reverse(end - start)))
        .or_else(|| {
            locative_positions(tokens).find_map(|i| {
                let (first, start) = run_start(text, tokens, i)?;
                plain_word_run(text, tokens, first).map(|end| (start, end))
            })
        })
}

/// First token of the name after the preposition at `locative`, and the byte
/// offset the name starts at. A leading "the" is stepped over; it stays part
/// of the name only when capitalized ("The Hague", but "the Bay Area").
fn run_start(text: &str, tokens: &[Token], locative: usize) -> Option<(usize, usize)> {
    let first = locative + 1;
    let token = tokens.get(first)?;
    if token.lemma != "the" {
        return Some((first, token.start));
    }

    let next = tokens.get(first + 1).filter(|next| token.adjoins(next, text))?;
    let start = if token.text == "The" { token.start } else { next.start };
    Some((first + 1, start))
}

fn locative_positions(tokens: &[Token]) -> impl Iterator<Item = usize> + '_ {
    tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| lexicon::is_locative(&t.lemma) && *i + 1 < tokens.len())
        .map(|(i, _)| i)
}

/// End offset of a run of proper nouns starting at `first`. Connectors such
/// as "de" are kept only when another proper noun follows.
fn proper_noun_run(text: &str, tokens: &[Token], first: usize) -> Option<usize> {
    let mut end = None;
    let mut i = first;

    while let Some(token) = tokens.get(i) {
        if i > first && !tokens[i - 1].adjoins(token, text) {
            break;
        }

        if token.pos == Pos::ProperNoun {
            end = Some(token.end);
        } else if end.is_some() && lexicon::is_connector(&token.lemma) {
            let continues = tokens
                .get(i + 1)
                .is_some_and(|next| next.pos == Pos::ProperNoun && token.adjoins(next, text));
            if !continues {
                break;
            }
        } else {
            break;
        }

        i += 1;
    }

    end
}

/// Lowercase fallback for transcribed speech: up to three content words.
fn plain_word_run(text: &str, tokens: &[Token], first: usize) -> Option<usize> {
    const MAX_WORDS: usize = 3;

    let mut end = None;
    for (offset, token) in tokens[first..].iter().take(MAX_WORDS).enumerate() {
        if offset > 0 && !tokens[first + offset - 1].adjoins(token, text) {
            break;
        }
        if !could_name_place(token) {
            break;
        }
        end = Some(token.end);
    }
    end
}

fn could_name_place(token: &Token) -> bool {
    token.pos != Pos::Number
        && !lexicon::is_stop_word(&token.lemma)
        && !lexicon::is_time_word(&token.lemma)
        && AttributeKind::from_keyword(&token.lemma).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::LexiconModel;

    fn run(text: &str) -> Extraction {
        let model = LexiconModel::builtin();
        extract(&model, text)
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn general_question_has_location_and_no_keywords() {
        let e = run("What's the weather like in Berlin?");
        assert_eq!(e.location.as_deref(), Some("Berlin"));
        assert!(e.keywords.is_empty());
    }

    #[test]
    fn records_every_attribute_keyword() {
        let e = run("Is it windy and hot in Paris?");
        assert_eq!(e.location.as_deref(), Some("Paris"));
        assert_eq!(e.keywords, keywords(&["hot", "windy"]));
    }

    #[test]
    fn inflected_keywords_are_normalized() {
        let e = run("Will it be raining or snowing in Oslo tonight?");
        assert_eq!(e.keywords, keywords(&["rain", "snow"]));
    }

    #[test]
    fn first_location_in_reading_order_wins() {
        assert_eq!(run("Is it colder in London or Paris?").location.as_deref(), Some("London"));
        assert_eq!(run("Paris or London, which is warmer?").location.as_deref(), Some("Paris"));
    }

    #[test]
    fn unknown_capitalized_place_after_preposition() {
        let e = run("How humid is it in Springfield tomorrow?");
        assert_eq!(e.location.as_deref(), Some("Springfield"));
        assert_eq!(e.keywords, keywords(&["humid"]));
    }

    #[test]
    fn multi_word_unknown_place_with_connector() {
        let e = run("Is it sunny in Santa Cruz de Tenerife?");
        assert_eq!(e.location.as_deref(), Some("Santa Cruz de Tenerife"));
    }

    #[test]
    fn lowercase_transcript_falls_back_to_words_after_preposition() {
        let e = run("what is the temperature in springfield");
        assert_eq!(e.location.as_deref(), Some("springfield"));
        assert_eq!(e.keywords, keywords(&["temperature"]));
    }

    #[test]
    fn no_location_is_absent() {
        let e = run("Is it going to rain?");
        assert_eq!(e.location, None);
        assert_eq!(e.keywords, keywords(&["rain"]));

        assert_eq!(run("How's the weather in my area?").location, None);
    }

    #[test]
    fn possessive_is_dropped_from_location() {
        assert_eq!(run("How's London's weather today?").location.as_deref(), Some("London"));
        assert_eq!(run("Springfield's forecast, please").location, None);
    }

    #[test]
    fn month_after_preposition_is_not_a_location() {
        let e = run("Will it rain in May in Paris?");
        assert_eq!(e.location.as_deref(), Some("Paris"));
        assert_eq!(e.keywords, keywords(&["rain"]));

        assert_eq!(run("What's the weather in March in Berlin?").location.as_deref(), Some("Berlin"));
        assert_eq!(run("how cold is it in january in oslo").location.as_deref(), Some("oslo"));
    }

    #[test]
    fn leading_article_is_skipped() {
        assert_eq!(run("What's the weather in The Hague?").location.as_deref(), Some("The Hague"));
        assert_eq!(run("Is it windy in The Dalles?").location.as_deref(), Some("The Dalles"));
        assert_eq!(
            run("What is the weather in the Bay Area?").location.as_deref(),
            Some("Bay Area")
        );
        assert_eq!(run("any rain in the lake district").location.as_deref(), Some("lake district"));
        assert_eq!(run("Is it cold in the morning?").location, None);
    }

    #[test]
    fn capitalized_place_is_not_read_as_a_keyword() {
        let e = run("Is it windy at Mount Rainier?");
        assert_eq!(e.location.as_deref(), Some("Mount Rainier"));
        assert_eq!(e.keywords, keywords(&["windy"]));
    }

    #[test]
    fn lowercase_place_at_sentence_start() {
        let e = run("paris or london, which is warmer?");
        assert_eq!(e.location.as_deref(), Some("paris"));
        assert_eq!(e.keywords, keywords(&["warm"]));
    }

    #[test]
    fn dotted_and_hyphenated_places() {
        assert_eq!(run("Is it humid in St.Louis?").location.as_deref(), Some("St.Louis"));
        assert_eq!(run("Rain in Saint-Denis tomorrow?").location.as_deref(), Some("Saint-Denis"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let model = LexiconModel::builtin();
        let text = "Is it windy and hot in Paris?";
        assert_eq!(extract(&model, text), extract(&model, text));
    }

    #[test]
    fn very_long_input_does_not_panic() {
        let text = format!("Is it cold in Oslo? {}", "é".repeat(MAX_INPUT_CHARS * 2));
        let e = run(&text);
        assert_eq!(e.location.as_deref(), Some("Oslo"));
    }
}
