use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    model::{AttributeKind, IntentKind},
    nlp::lexicon,
};

/// Map extracted keywords to an intent and the attributes to answer, in the
/// order they were first mentioned in `text`.
///
/// Total over its input: unknown keywords are ignored and an empty result
/// becomes `[General]`.
pub fn resolve(keywords: &BTreeSet<String>, text: &str) -> (IntentKind, Vec<AttributeKind>) {
    let keywords: BTreeSet<String> = keywords.iter().map(|k| lexicon::normalize(k)).collect();
    let words: Vec<String> = lexicon::words(text).map(|w| lexicon::normalize(&w)).collect();

    let mut attributes = Vec::new();

    let mentioned = words.iter().filter(|w| keywords.contains(*w));
    // Keywords that never show up in the text keep a stable order at the end.
    for keyword in mentioned.chain(keywords.iter()) {
        if let Some(kind) = AttributeKind::from_keyword(keyword) {
            if !attributes.contains(&kind) {
                attributes.push(kind);
            }
        }
    }

    if attributes.is_empty() {
        attributes.push(AttributeKind::General);
    }

    let intent = if lexicon::has_temporal_marker(&words) {
        IntentKind::Forecast
    } else {
        IntentKind::CurrentWeather
    };

    debug!(%intent, ?attributes, "resolved question intent");

    (intent, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn no_keywords_means_general() {
        let (intent, attrs) = resolve(&set(&[]), "What's the weather like in Berlin?");
        assert_eq!(intent, IntentKind::CurrentWeather);
        assert_eq!(attrs, vec![AttributeKind::General]);
    }

    #[test]
    fn attribute_order_follows_the_text() {
        let (_, attrs) = resolve(&set(&["hot", "windy"]), "Is it windy and hot in Paris?");
        assert_eq!(attrs, vec![AttributeKind::Wind, AttributeKind::Temperature]);

        let (_, attrs) = resolve(&set(&["hot", "windy"]), "Is it hot and windy in Paris?");
        assert_eq!(attrs, vec![AttributeKind::Temperature, AttributeKind::Wind]);
    }

    #[test]
    fn synonyms_collapse_into_one_attribute() {
        let (_, attrs) =
            resolve(&set(&["rain", "snow", "cold"]), "Rain, snow or just cold in Oslo?");
        assert_eq!(attrs, vec![AttributeKind::Precipitation, AttributeKind::Temperature]);
    }

    #[test]
    fn tomorrow_forces_forecast() {
        let (intent, attrs) =
            resolve(&set(&["temperature"]), "What's the temperature in Tokyo tomorrow?");
        assert_eq!(intent, IntentKind::Forecast);
        assert_eq!(attrs, vec![AttributeKind::Temperature]);
    }

    #[test]
    fn other_forecast_markers() {
        for text in [
            "Will it rain tonight in Rome?",
            "Any sun this weekend in Lisbon?",
            "Rain next week in Madrid?",
            "Give me the forecast for Oslo",
        ] {
            assert_eq!(resolve(&set(&[]), text).0, IntentKind::Forecast, "{text}");
        }
        assert_eq!(resolve(&set(&[]), "Is it sunny today?").0, IntentKind::CurrentWeather);
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let (_, attrs) = resolve(&set(&["banana"]), "banana weather in Lima");
        assert_eq!(attrs, vec![AttributeKind::General]);
    }

    #[test]
    fn keywords_missing_from_text_are_appended() {
        let (_, attrs) = resolve(&set(&["humid", "windy"]), "Is it windy in Lima?");
        assert_eq!(attrs, vec![AttributeKind::Wind, AttributeKind::Humidity]);
    }
}
