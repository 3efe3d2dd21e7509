use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A weather facet a question can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Temperature,
    Condition,
    Wind,
    Humidity,
    Precipitation,
    General,
}

impl AttributeKind {
    pub const fn all() -> &'static [AttributeKind] {
        &[
            AttributeKind::Temperature,
            AttributeKind::Condition,
            AttributeKind::Wind,
            AttributeKind::Humidity,
            AttributeKind::Precipitation,
            AttributeKind::General,
        ]
    }

    /// Base-form keywords that select this attribute.
    ///
    /// `General` has none: it is only ever the fallback when nothing matched.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            AttributeKind::Temperature => &[
                "temperature",
                "temp",
                "degree",
                "hot",
                "cold",
                "warm",
                "cool",
                "chilly",
                "freezing",
                "heat",
                "celsius",
            ],
            AttributeKind::Condition => &[
                "condition",
                "sky",
                "sunny",
                "sun",
                "sunshine",
                "cloud",
                "cloudy",
                "clear",
                "overcast",
                "fog",
                "foggy",
            ],
            AttributeKind::Wind => &["wind", "windy", "breeze", "breezy", "gust", "gusty"],
            AttributeKind::Humidity => &["humidity", "humid", "muggy", "damp"],
            AttributeKind::Precipitation => &[
                "rain",
                "rainy",
                "snow",
                "snowy",
                "precipitation",
                "drizzle",
                "shower",
                "storm",
                "stormy",
                "thunderstorm",
                "rainfall",
                "umbrella",
                "sleet",
                "hail",
            ],
            AttributeKind::General => &[],
        }
    }

    /// Look up the attribute a normalized keyword belongs to.
    pub fn from_keyword(keyword: &str) -> Option<AttributeKind> {
        AttributeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.keywords().contains(&keyword))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Temperature => "temperature",
            AttributeKind::Condition => "condition",
            AttributeKind::Wind => "wind",
            AttributeKind::Humidity => "humidity",
            AttributeKind::Precipitation => "precipitation",
            AttributeKind::General => "general",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the question is about now or about the days ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    #[default]
    CurrentWeather,
    Forecast,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IntentKind::CurrentWeather => "current weather",
            IntentKind::Forecast => "forecast",
        })
    }
}

/// Structured reading of a single user utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub raw_text: String,
    pub location: Option<String>,
    /// Never empty; `[General]` when no attribute keyword matched.
    pub attributes: Vec<AttributeKind>,
    pub intent: IntentKind,
}

/// Unit system requested from a provider. Only metric is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

/// Provider-agnostic request built from a location and an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    pub location: String,
    pub units: Units,
    pub forecast: bool,
}

/// Normalized weather snapshot returned by every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: String,
    pub temperature_c: f64,
    pub condition: String,
    pub wind_speed_kph: f64,
    pub humidity_pct: u8,
    pub precipitation_mm: f64,
    pub timestamp: DateTime<Utc>,
}
