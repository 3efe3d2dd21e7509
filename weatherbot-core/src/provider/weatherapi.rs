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

const NAME: &str = "weatherapi";
const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

// Free plan limit.
const MAX_FORECAST_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
    base_url: String,
    forecast_lead: chrono::Duration,
}

impl WeatherApiProvider {
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
        extra: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/v1/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query.location.as_str())])
            .query(extra)
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
        let parsed: WaResponse = self.get("current.json", query, &[]).await?;

        let ts = parsed.current.last_updated_epoch.or(parsed.location.localtime_epoch);
        let timestamp = ts.and_then(|ts| DateTime::from_timestamp(ts, 0)).unwrap_or_else(Utc::now);

        Ok(WeatherRecord {
            location: parsed.location.display_name(),
            temperature_c: parsed.current.temp_c,
            condition: parsed.current.condition.text,
            wind_speed_kph: parsed.current.wind_kph,
            humidity_pct: parsed.current.humidity,
            precipitation_mm: parsed.current.precip_mm,
            timestamp,
        })
    }

    async fn fetch_forecast(
        &self,
        query: &QueryDescriptor,
        when: DateTime<Utc>,
    ) -> Result<WeatherRecord, ProviderError> {
        let days = forecast_days(Utc::now(), when);
        let parsed: WaForecastResponse =
            self.get("forecast.json", query, &[("days", days.to_string())]).await?;

        let hours: Vec<&WaForecastHour> =
            parsed.forecast.forecastday.iter().flat_map(|day| day.hour.iter()).collect();

        let hour = nearest(&hours, when.timestamp(), |h| h.time_epoch)
            .ok_or(ProviderError::MissingData { provider: NAME, what: "hourly forecast data" })?;

        Ok(WeatherRecord {
            location: parsed.location.display_name(),
            temperature_c: hour.temp_c,
            condition: hour.condition.text.clone(),
            wind_speed_kph: hour.wind_kph,
            humidity_pct: hour.humidity,
            precipitation_mm: hour.precip_mm,
            timestamp: DateTime::from_timestamp(hour.time_epoch, 0).unwrap_or(when),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime_epoch: Option<i64>,
}

impl WaLocation {
    fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    #[serde(default)]
    precip_mm: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time_epoch: i64,
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    #[serde(default)]
    precip_mm: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<WeatherRecord, ProviderError> {
        info!(provider = NAME, location = %query.location, forecast = query.forecast, "fetching weather");

        if query.forecast {
            self.fetch_forecast(query, Utc::now() + self.forecast_lead).await
        } else {
            self.fetch_current(query).await
        }
    }
}

/// Number of forecast days needed to cover `when`, counting today.
fn forecast_days(now: DateTime<Utc>, when: DateTime<Utc>) -> i64 {
    let ahead = (when.date_naive() - now.date_naive()).num_days();
    (ahead + 1).clamp(1, MAX_FORECAST_DAYS)
}
