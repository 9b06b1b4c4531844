// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Current conditions and coordinates for a location, via weatherapi.com.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::get_setting;

pub const API_KEY_ENV: &str = "WANDERLY_WEATHER_API_KEY";
pub const API_KEY_SETTING: &str = "weather_api_key";
const BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Deserialize)]
struct Response {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub location: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temp_c: f64,
    pub condition: String,
}

pub fn parse_current(body: &str) -> Result<Conditions> {
    let r: Response =
        serde_json::from_str(body).context("Unexpected weather response shape")?;
    Ok(Conditions {
        location: r.location.name,
        country: r.location.country,
        latitude: r.location.lat,
        longitude: r.location.lon,
        temp_c: r.current.temp_c,
        condition: r.current.condition.text,
    })
}

/// Environment first, then the stored setting.
pub fn api_key(conn: &Connection) -> Result<String> {
    if let Ok(k) = std::env::var(API_KEY_ENV) {
        if !k.trim().is_empty() {
            return Ok(k.trim().to_string());
        }
    }
    get_setting(conn, API_KEY_SETTING)?
        .filter(|k| !k.trim().is_empty())
        .with_context(|| {
            format!(
                "No weather API key; set {} or run `wanderly config set {} <key>`",
                API_KEY_ENV, API_KEY_SETTING
            )
        })
}

pub fn fetch_current(
    client: &reqwest::blocking::Client,
    key: &str,
    location: &str,
) -> Result<Conditions> {
    debug!(location, "fetching current weather");
    let resp = client
        .get(format!("{BASE_URL}/current.json"))
        .query(&[("key", key), ("q", location)])
        .send()
        .with_context(|| format!("Weather request for '{}' failed", location))?
        .error_for_status()
        .with_context(|| format!("Weather service rejected '{}'", location))?;
    let body = resp.text()?;
    parse_current(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_conditions_and_coordinates() {
        let body = r#"{
            "location": {"name": "Kyoto", "region": "Kyoto", "country": "Japan",
                         "lat": 35.0, "lon": 135.75, "tz_id": "Asia/Tokyo"},
            "current": {"temp_c": 11.5, "temp_f": 52.7,
                        "condition": {"text": "Light rain", "icon": "//cdn/x.png", "code": 1183}}
        }"#;
        let c = parse_current(body).unwrap();
        assert_eq!(c.location, "Kyoto");
        assert_eq!(c.country, "Japan");
        assert_eq!(c.latitude, 35.0);
        assert_eq!(c.longitude, 135.75);
        assert_eq!(c.temp_c, 11.5);
        assert_eq!(c.condition, "Light rain");
    }

    #[test]
    fn error_payload_is_rejected() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        assert!(parse_current(body).is_err());
    }
}
