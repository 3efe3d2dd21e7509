use crate::{
    error::BotError,
    model::{IntentKind, QueryDescriptor, Units},
};

/// Turn a location and intent into a provider request.
///
/// Units are always metric.
pub fn build(location: &str, intent: IntentKind) -> Result<QueryDescriptor, BotError> {
    let trimmed = location.trim();

    if !trimmed.chars().any(char::is_alphanumeric) {
        return Err(BotError::InvalidLocation(location.to_string()));
    }

    Ok(QueryDescriptor {
        location: trimmed.to_string(),
        units: Units::Metric,
        forecast: intent == IntentKind::Forecast,
    })
}
