//! Email report request model and validation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::WeatherSummary;

/// Inbound request to email a weather report
///
/// Every field is optional here because the request arrives from outside;
/// [`ReportRequest::validate`] decides whether it is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub email: Option<String>,
    pub location: Option<String>,
    /// Any JSON number is accepted and floored
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub icon: Option<String>,
}

/// Reason a report request failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFields,
    InvalidEmail,
    InvalidValues,
}

impl Rejection {
    /// Fixed caller-facing reason
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::MissingFields => "missing required fields",
            Rejection::InvalidEmail => "invalid email address",
            Rejection::InvalidValues => "invalid weather values",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl ReportRequest {
    /// Build a complete request from a lookup result
    #[must_use]
    pub fn new(email: impl Into<String>, summary: &WeatherSummary) -> Self {
        Self {
            email: Some(email.into()),
            location: Some(summary.location.clone()),
            temperature: Some(f64::from(summary.temperature_celsius)),
            humidity: Some(summary.humidity_percent),
            wind_speed: Some(summary.wind_speed_kmh),
            icon: Some(summary.icon_reference.clone()),
        }
    }

    /// Check completeness, then the address, then the value ranges
    pub fn validate(&self) -> Result<(EmailAddress, WeatherSummary), Rejection> {
        let (
            Some(email),
            Some(location),
            Some(temperature),
            Some(humidity),
            Some(wind_speed),
            Some(icon),
        ) = (
            self.email.as_deref(),
            non_blank(self.location.as_deref()),
            self.temperature,
            self.humidity,
            self.wind_speed,
            non_blank(self.icon.as_deref()),
        )
        else {
            return Err(Rejection::MissingFields);
        };

        if email.trim().is_empty() {
            return Err(Rejection::MissingFields);
        }
        let address = EmailAddress::parse(email).ok_or(Rejection::InvalidEmail)?;

        if !temperature.is_finite()
            || !(0.0..=100.0).contains(&humidity)
            || !wind_speed.is_finite()
            || wind_speed < 0.0
        {
            return Err(Rejection::InvalidValues);
        }
        let temperature_celsius =
            i32::try_from(temperature.floor() as i64).map_err(|_| Rejection::InvalidValues)?;

        let summary = WeatherSummary {
            location: location.trim().to_string(),
            temperature_celsius,
            humidity_percent: humidity,
            wind_speed_kmh: wind_speed,
            icon_reference: icon.trim().to_string(),
        };
        Ok((address, summary))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Destination address that passed basic syntactic validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Accepts `local@domain.tld` shapes: one `@`, no whitespace, a non-empty
    /// local part and a dotted domain with non-empty labels.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let candidate = input.trim();
        if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
            return None;
        }

        let (local, domain) = candidate.split_once('@')?;
        if local.is_empty() || domain.contains('@') {
            return None;
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return None;
        }

        Some(Self(candidate.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
