//! Weather clients: OpenWeatherMap (keyed) and wttr.in (key-less)

use super::{WeatherReport, WeatherSource, ensure_success, http_client};
use crate::error::{BriefingError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const OPENWEATHER_GEOCODE_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const WTTR_BASE_URL: &str = "https://wttr.in/";

/// Condition, temperature, humidity and wind separated by `|`
const WTTR_FORMAT: &str = "%C|%t|%h|%w";

fn require_location(location: &str) -> Result<&str> {
    let location = location.trim();
    if location.is_empty() {
        return Err(BriefingError::NotFound("no location given".to_string()));
    }
    Ok(location)
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: Option<MainReadings>,
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
}

/// OpenWeatherMap client: geocodes the location, then reads current conditions
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Create a new client. Without a key every request fails with a configuration error.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| BriefingError::Config("WEATHER_API_KEY is not set".to_string()))
    }

    async fn coordinates(&self, location: &str, api_key: &str) -> Result<(f64, f64)> {
        let response = self
            .client
            .get(OPENWEATHER_GEOCODE_URL)
            .query(&[("q", location), ("limit", "1"), ("appid", api_key)])
            .send()
            .await?;
        let entries: Vec<GeocodeEntry> = ensure_success(response, "OpenWeatherMap geocoding")
            .await?
            .json()
            .await?;

        entries
            .into_iter()
            .next()
            .and_then(|e| Some((e.lat?, e.lon?)))
            .ok_or_else(|| BriefingError::NotFound(location.to_string()))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, location: &str) -> Result<WeatherReport> {
        let location = require_location(location)?;
        let api_key = self.api_key()?;

        let (lat, lon) = self.coordinates(location, api_key).await?;
        tracing::debug!(location, lat, lon, "Geocoded location");

        let response = self
            .client
            .get(OPENWEATHER_CURRENT_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;
        let current: CurrentWeather = ensure_success(response, "OpenWeatherMap")
            .await?
            .json()
            .await?;

        report_from_current(location, current)
    }
}

fn report_from_current(location: &str, current: CurrentWeather) -> Result<WeatherReport> {
    let main = current.main.ok_or_else(|| {
        BriefingError::Parse("weather data not available for this location".to_string())
    })?;

    let condition = current
        .weather
        .into_iter()
        .find_map(|w| w.description)
        .unwrap_or_else(|| "N/A".to_string());
    let temperature = main
        .temp
        .map_or_else(|| "N/A".to_string(), |t| format!("{t}°C"));

    Ok(WeatherReport {
        location: location.to_string(),
        condition,
        temperature,
        humidity: main.humidity.map(|h| format!("{h}%")),
        wind: current.wind.and_then(|w| w.speed).map(|s| format!("{s} m/s")),
    })
}

/// wttr.in client; needs no API key
pub struct WttrClient {
    client: Client,
    base_url: Url,
}

impl WttrClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: Url::parse(WTTR_BASE_URL)?,
        })
    }

    fn location_url(&self, location: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BriefingError::Config("wttr.in base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(location);
        url.query_pairs_mut().append_pair("format", WTTR_FORMAT);
        Ok(url)
    }
}

#[async_trait]
impl WeatherSource for WttrClient {
    async fn current(&self, location: &str) -> Result<WeatherReport> {
        let location = require_location(location)?;
        let url = self.location_url(location)?;
        tracing::debug!(%url, "Requesting wttr.in conditions");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BriefingError::NotFound(location.to_string()));
        }
        let body = ensure_success(response, "wttr.in").await?.text().await?;

        parse_wttr(location, &body)
    }
}

fn parse_wttr(location: &str, body: &str) -> Result<WeatherReport> {
    let body = body.trim();
    if body.is_empty() || body.to_ascii_lowercase().starts_with("unknown location") {
        return Err(BriefingError::NotFound(location.to_string()));
    }

    let parts: Vec<&str> = body.split('|').map(str::trim).collect();
    let [condition, temperature, humidity, wind] = parts.as_slice() else {
        return Err(BriefingError::Parse(format!(
            "unexpected wttr.in response: {body}"
        )));
    };

    Ok(WeatherReport {
        location: location.to_string(),
        condition: (*condition).to_string(),
        temperature: (*temperature).to_string(),
        humidity: Some((*humidity).to_string()).filter(|h| !h.is_empty()),
        wind: Some((*wind).to_string()).filter(|w| !w.is_empty()),
    })
}
