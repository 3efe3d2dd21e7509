use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::info;

use crate::{
    config::DEFAULT_FORECAST_LEAD_HOURS,
    error::ProviderError,
    model::{QueryDescriptor, WeatherRecord},
    provider::{http_client, nearest},
};

use super::WeatherProvider;

const NAME: &str = "openweather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

// OpenWeather reports metric wind speed in m/s.
const MPS_TO_KPH: f64 = 3.6;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
    forecast_lead: chrono::Duration,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: http_client(),
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_lead: chrono::Duration::hours(i64::from(DEFAULT_FORECAST_LEAD_HOURS)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_forecast_lead(mut self, lead: chrono::Duration) -> Self {
        self.forecast_lead = lead;
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryDescriptor,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: NAME, source })?;

        let status = res.status();
        let body =
            res.text().await.map_err(|source| ProviderError::Transport { provider: NAME, source })?;

        if !status.is_success() {
            return Err(ProviderError::from_status(NAME, status.as_u16(), &body, &query.location));
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Parse { provider: NAME, source })
    }

    async fn fetch_current(&self, query: &QueryDescriptor) -> Result<WeatherRecord, ProviderError> {
        let parsed: OwCurrentResponse = self.get("weather", query).await?;

        Ok(WeatherRecord {
            location: parsed.name,
            temperature_c: parsed.main.temp,
            condition: condition_of(&parsed.weather),
            wind_speed_kph: parsed.wind.speed * MPS_TO_KPH,
            humidity_pct: parsed.main.humidity,
            precipitation_mm: precipitation(&parsed.rain, &parsed.snow, |p| p.one_hour),
            timestamp: unix_to_utc(parsed.dt),
        })
    }

    async fn fetch_forecast(
        &self,
        query: &QueryDescriptor,
        when: DateTime<Utc>,
    ) -> Result<WeatherRecord, ProviderError> {
        let parsed: OwForecastResponse = self.get("forecast", query).await?;

        let entry = nearest(&parsed.list, when.timestamp(), |e| e.dt)
            .ok_or(ProviderError::MissingData { provider: NAME, what: "forecast entries" })?;

        Ok(WeatherRecord {
            location: format!("{}, {}", parsed.city.name, parsed.city.country),
            temperature_c: entry.main.temp,
            condition: condition_of(&entry.weather),
            wind_speed_kph: entry.wind.speed * MPS_TO_KPH,
            humidity_pct: entry.main.humidity,
            precipitation_mm: precipitation(&entry.rain, &entry.snow, |p| p.three_hours),
            timestamp: unix_to_utc(entry.dt),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<WeatherRecord, ProviderError> {
        info!(provider = NAME, location = %query.location, forecast = query.forecast, "fetching weather");

        if query.forecast {
            self.fetch_forecast(query, Utc::now() + self.forecast_lead).await
        } else {
            self.fetch_current(query).await
        }
    }
}

fn condition_of(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn precipitation(
    rain: &Option<OwPrecipitation>,
    snow: &Option<OwPrecipitation>,
    amount: impl Fn(&OwPrecipitation) -> Option<f64>,
) -> f64 {
    [rain, snow].into_iter().flatten().filter_map(&amount).sum()
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precipitation_sums_rain_and_snow() {
        let rain = Some(OwPrecipitation { one_hour: Some(1.5), three_hours: Some(4.0) });
        let snow = Some(OwPrecipitation { one_hour: Some(0.25), three_hours: None });

        assert_eq!(precipitation(&rain, &snow, |p| p.one_hour), 1.75);
        assert_eq!(precipitation(&rain, &snow, |p| p.three_hours), 4.0);
        assert_eq!(precipitation(&None, &None, |p| p.one_hour), 0.0);
    }

    #[test]
    fn current_payload_without_precipitation_parses() {
        let body = r#"{
            "name": "Berlin", "dt": 1760000000,
            "main": {"temp": 15.4, "feels_like": 14.0, "humidity": 60},
            "weather": [{"description": "broken clouds"}],
            "wind": {"speed": 3.4}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.rain.is_none());
        assert_eq!(condition_of(&parsed.weather), "broken clouds");
    }
}
