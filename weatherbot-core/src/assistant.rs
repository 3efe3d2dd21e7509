use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    compose::compose_answer,
    error::BotError,
    extract::extract,
    intent::resolve,
    model::{Query, WeatherRecord},
    nlp::LanguageModel,
    provider::WeatherProvider,
    query::build,
};

/// Result of a successfully answered question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub query: Query,
    pub record: WeatherRecord,
    pub text: String,
}

/// The question → answer pipeline.
///
/// Holds no per-query state, so one instance can serve any number of
/// questions, from several tasks if needed.
#[derive(Debug, Clone)]
pub struct Assistant<P> {
    model: Arc<dyn LanguageModel>,
    provider: P,
}

impl<P: WeatherProvider> Assistant<P> {
    pub fn new(model: Arc<dyn LanguageModel>, provider: P) -> Self {
        Self { model, provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Parse a question without contacting the provider.
    pub fn understand(&self, text: &str) -> Query {
        let extraction = extract(self.model.as_ref(), text);
        let (intent, attributes) = resolve(&extraction.keywords, text);

        Query { raw_text: text.to_string(), location: extraction.location, attributes, intent }
    }

    pub async fn answer(&self, text: &str) -> Result<Answer, BotError> {
        let query = self.understand(text);

        let location = query.location.as_deref().ok_or(BotError::NoLocationFound)?;
        let descriptor = build(location, query.intent)?;
        debug!(?descriptor, "built provider query");

        let record = self.provider.fetch(&descriptor).await.inspect_err(|err| {
            warn!(%err, location = %descriptor.location, "weather fetch failed");
        })?;

        let text = compose_answer(query.intent, &query.attributes, &record);

        Ok(Answer { query, record, text })
    }
}
