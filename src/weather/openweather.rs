//! OpenWeatherMap current-weather response structures and conversion

use serde::Deserialize;
use serde_json::Value;

use super::icons::WeatherIcon;
use crate::error::LookupError;
use crate::models::WeatherSummary;

const KMH_PER_MS: f64 = 3.6;

/// Fields present on every response, success or failure
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Numeric on success, often a string such as `"404"` on failure
    pub cod: Option<Value>,
    /// Text on failure; some endpoints send a number here on success
    pub message: Option<Value>,
}

impl Envelope {
    /// Status code carried in `cod`, if it is numeric
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self.cod.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Map a non-OK envelope to a provider error
    pub fn check(&self) -> Result<(), LookupError> {
        match self.status_code() {
            Some(200) => Ok(()),
            code => Err(LookupError::provider(
                code,
                self.message
                    .as_ref()
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .map_or_else(|| "unknown provider error".to_string(), str::to_string),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub main: MainData,
    pub wind: WindData,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct MainData {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct WindData {
    /// Metres per second when `units=metric`
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub icon: String,
}

impl CurrentResponse {
    /// Normalize into a [`WeatherSummary`]
    pub fn into_summary(self) -> Result<WeatherSummary, LookupError> {
        let CurrentResponse {
            name,
            main,
            wind,
            weather,
        } = self;

        if name.trim().is_empty() {
            return Err(LookupError::transport(
                "weather service returned no location name",
            ));
        }
        if !main.temp.is_finite() || !main.humidity.is_finite() || !wind.speed.is_finite() {
            return Err(LookupError::transport(
                "weather service returned invalid measurements",
            ));
        }

        let temperature_celsius = i32::try_from(main.temp.floor() as i64).map_err(|_| {
            LookupError::transport("weather service returned invalid measurements")
        })?;

        let icon = weather
            .first()
            .map_or(WeatherIcon::DEFAULT, |c| {
                WeatherIcon::from_condition_code(&c.icon)
            });

        Ok(WeatherSummary {
            location: name,
            temperature_celsius,
            humidity_percent: main.humidity.clamp(0.0, 100.0),
            wind_speed_kmh: wind.speed.max(0.0) * KMH_PER_MS,
            icon_reference: icon.reference().to_string(),
        })
    }
}
