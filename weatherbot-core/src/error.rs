use thiserror::Error;

/// Failures surfaced by a weather provider while fetching a record.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to reach {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} does not know the location '{location}'")]
    UnknownLocation { provider: &'static str, location: String },

    #[error("{provider} rejected the configured API key")]
    Unauthorized { provider: &'static str },

    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    #[error("{provider} request failed with status {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },

    #[error("Failed to parse {provider} response: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response contained no {what}")]
    MissingData { provider: &'static str, what: &'static str },
}

impl ProviderError {
    /// Classify a non-success HTTP response.
    pub fn from_status(provider: &'static str, status: u16, body: &str, location: &str) -> Self {
        match status {
            404 => ProviderError::UnknownLocation { provider, location: location.to_string() },
            // WeatherAPI answers 400 with error code 1006 for unknown places.
            400 if body.contains("1006") => {
                ProviderError::UnknownLocation { provider, location: location.to_string() }
            }
            401 | 403 => ProviderError::Unauthorized { provider },
            429 => ProviderError::RateLimited { provider },
            _ => ProviderError::Status { provider, status, body: truncate_body(body) },
        }
    }
}

/// Errors produced while turning a question into an answer.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("no location found in the question")]
    NoLocationFound,

    #[error("invalid location: {0:?}")]
    InvalidLocation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Not produced today: unknown keyword mixes fall back to `General`.
    #[error("unsupported intent: {0}")]
    UnsupportedIntent(String),
}

impl BotError {
    /// Text shown or spoken to the user before re-prompting.
    pub fn user_message(&self) -> String {
        match self {
            BotError::NoLocationFound => {
                "Could not determine the location from your question.".to_string()
            }
            BotError::InvalidLocation(location) => {
                format!("'{location}' is not a location I can look up.")
            }
            BotError::Provider(ProviderError::UnknownLocation { location, .. }) => {
                format!("Could not find weather data for {location}. Please check the location name.")
            }
            BotError::Provider(ProviderError::RateLimited { .. }) => {
                "The weather service is busy right now. Please try again in a minute.".to_string()
            }
            BotError::Provider(err) => format!("Error fetching weather data: {err}"),
            BotError::UnsupportedIntent(intent) => {
                format!("Sorry, I can't answer {intent} questions yet.")
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
