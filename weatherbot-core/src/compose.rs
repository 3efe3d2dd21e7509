//! Answer phrasing.
//!
//! Rounding is part of the observable output: temperature to whole degrees,
//! wind and precipitation to one decimal, humidity as a whole percent.

use crate::model::{AttributeKind, IntentKind, WeatherRecord};

/// One sentence per attribute, in the given order, joined by a space.
pub fn compose(attributes: &[AttributeKind], record: &WeatherRecord) -> String {
    let mut seen = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        if !seen.contains(attribute) {
            seen.push(*attribute);
        }
    }

    if seen.is_empty() {
        return clause(AttributeKind::General, record);
    }

    seen.iter().map(|a| clause(*a, record)).collect::<Vec<_>>().join(" ")
}

/// Like [`compose`], with a heading naming the forecast time.
pub fn compose_answer(
    intent: IntentKind,
    attributes: &[AttributeKind],
    record: &WeatherRecord,
) -> String {
    let body = compose(attributes, record);

    match intent {
        IntentKind::CurrentWeather => body,
        IntentKind::Forecast => {
            let when = record.timestamp.format("%A, %B %d at %H:%M UTC");
            format!("Forecast for {when}: {body}")
        }
    }
}

pub fn clause(attribute: AttributeKind, record: &WeatherRecord) -> String {
    let location = &record.location;

    match attribute {
        AttributeKind::Temperature => {
            format!("The temperature in {location} is {}°C.", whole(record.temperature_c))
        }
        AttributeKind::Condition => format!("Conditions in {location}: {}.", record.condition),
        AttributeKind::Wind => {
            format!("The wind speed in {location} is {} km/h.", one_decimal(record.wind_speed_kph))
        }
        AttributeKind::Humidity => {
            format!("The humidity in {location} is {}%.", record.humidity_pct)
        }
        AttributeKind::Precipitation => format!(
            "Precipitation in {location} is {} mm.",
            one_decimal(record.precipitation_mm)
        ),
        AttributeKind::General => format!(
            "The weather in {location} is {} with a temperature of {}°C.",
            record.condition,
            whole(record.temperature_c)
        ),
    }
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}

fn one_decimal(value: f64) -> String {
    // + 0.0 turns -0.0 into 0.0
    format!("{:.1}", (value * 10.0).round() / 10.0 + 0.0)
}
