//! Normalized weather summary

use serde::{Deserialize, Serialize};

/// Current conditions for one location, independent of the provider's shape
///
/// Serialized with the same field names the `/send-email` endpoint accepts,
/// so a client can forward a lookup result unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSummary {
    /// Provider-resolved location name
    pub location: String,
    /// Temperature in Celsius, floored
    #[serde(rename = "temperature")]
    pub temperature_celsius: i32,
    /// Relative humidity, 0-100
    #[serde(rename = "humidity")]
    pub humidity_percent: f64,
    /// Wind speed in km/h
    #[serde(rename = "windSpeed")]
    pub wind_speed_kmh: f64,
    /// Icon asset identifier such as `clear` or `rain`
    #[serde(rename = "icon")]
    pub icon_reference: String,
}

impl WeatherSummary {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_celsius)
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity_percent)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h", self.wind_speed_kmh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> WeatherSummary {
        WeatherSummary {
            location: "London".to_string(),
            temperature_celsius: -1,
            humidity_percent: 81.0,
            wind_speed_kmh: 14.8,
            icon_reference: "rain".to_string(),
        }
    }

    #[test]
    fn test_serializes_with_request_field_names() {
        let json = serde_json::to_value(summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "location": "London",
                "temperature": -1,
                "humidity": 81.0,
                "windSpeed": 14.8,
                "icon": "rain"
            })
        );
    }

    #[test]
    fn test_formatting() {
        let weather = summary();
        assert_eq!(weather.format_temperature(), "-1°C");
        assert_eq!(weather.format_humidity(), "81%");
        assert_eq!(weather.format_wind(), "14.8 km/h");
    }
}
