//! Weather lookup against Open-Meteo: geocode the ZIP, then read current
//! conditions for the first match.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::WeatherError;
use crate::state::WeatherPatch;
use crate::storage::WeatherConfig;

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Degrees Fahrenheit, rounded.
    pub temperature: i32,
    /// `"<label> · <place>"`.
    pub condition: String,
}

impl WeatherReport {
    /// Patch that records this report as the cached lookup for `zip`.
    pub fn into_patch(self, zip: &str, now: DateTime<Utc>) -> WeatherPatch {
        WeatherPatch {
            zip: Some(zip.to_string()),
            cached_at: Some(now.timestamp_millis()),
            temperature: Some(Some(self.temperature)),
            condition: Some(Some(self.condition)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i64,
}

#[derive(Clone)]
pub struct WeatherClient {
    geocoding_url: String,
    forecast_url: String,
    http_client: Client,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            http_client: Client::new(),
        }
    }

    /// Look up current conditions for a ZIP or place name.
    pub async fn fetch(&self, zip: &str) -> Result<WeatherReport, WeatherError> {
        let geocoding = Url::parse_with_params(
            &self.geocoding_url,
            &[
                ("name", zip),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ],
        )?;
        let places: GeocodingResponse = self
            .http_client
            .get(geocoding)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let place = places
            .results
            .into_iter()
            .next()
            .ok_or(WeatherError::LocationNotFound)?;

        let forecast = Url::parse_with_params(
            &self.forecast_url,
            &[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ],
        )?;
        let response: ForecastResponse = self
            .http_client
            .get(forecast)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let current = response
            .current_weather
            .ok_or(WeatherError::Unavailable)?;

        tracing::debug!(zip, place = %place.name, code = current.weathercode, "weather fetched");
        Ok(WeatherReport {
            temperature: celsius_to_fahrenheit(current.temperature),
            condition: format!("{} · {}", condition_label(current.weathercode), place.name),
        })
    }
}

/// Rounded to the nearest degree; halves go up, including below zero.
pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    (celsius * 9.0 / 5.0 + 32.0 + 0.5).floor() as i32
}

/// Short label for a WMO weather code.
pub fn condition_label(code: i64) -> &'static str {
    match code {
        0 => "Clear skies",
        1 | 2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 | 53 | 55 | 61 | 63 | 65 => "Rainy",
        71 | 73 | 75 => "Snowy",
        _ => "Shifting weather",
    }
}
