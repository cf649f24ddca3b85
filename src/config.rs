//! Configuration management for the weather mailer service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates all settings before any component is built.
//! Credentials live here and are handed to components at construction.

use crate::AppError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "WEATHER_MAILER_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Mail relay settings
    #[serde(default)]
    pub mail: MailConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider settings
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,
    /// Current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// SMTP relay settings
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Relay host, reached over implicit TLS
    #[serde(default = "default_mail_host")]
    pub host: String,
    #[serde(default = "default_mail_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Display name in the From header
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Sender address, defaults to `username`
    #[serde(default)]
    pub from_address: String,
    /// SMTP timeout in seconds
    #[serde(default = "default_mail_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Front-end origin allowed by CORS, `*` for any
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_mail_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_mail_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Weather Mailer".to_string()
}

fn default_mail_timeout() -> u32 {
    30
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_mail_host(),
            port: default_mail_port(),
            username: String::new(),
            password: String::new(),
            from_name: default_from_name(),
            from_address: String::new(),
            timeout_seconds: default_mail_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("from_name", &self.from_name)
            .field("from_address", &self.from_address)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        let settings = Config::builder()
            .add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            // e.g. WEATHER_MAILER_WEATHER__API_KEY
            .add_source(
                Environment::with_prefix("WEATHER_MAILER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Fill values derived from other settings
    pub fn apply_defaults(&mut self) {
        if self.mail.from_address.is_empty() {
            self.mail.from_address = self.mail.username.clone();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.mail.timeout_seconds == 0 {
            self.mail.timeout_seconds = default_mail_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_credentials(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(AppError::config(
                "Weather API key is required. Set WEATHER_MAILER_WEATHER__API_KEY.",
            )
            .into());
        }

        if self.mail.username.trim().is_empty() || self.mail.password.is_empty() {
            return Err(AppError::config(
                "Mail relay credentials are required. Set WEATHER_MAILER_MAIL__USERNAME and WEATHER_MAILER_MAIL__PASSWORD.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(AppError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.mail.timeout_seconds > 300 {
            return Err(AppError::config("Mail relay timeout cannot exceed 300 seconds").into());
        }

        if self.mail.port == 0 {
            return Err(AppError::config("Mail relay port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AppError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AppError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(AppError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.mail.host.trim().is_empty() {
            return Err(AppError::config("Mail relay host cannot be empty").into());
        }

        if self.server.allowed_origin.trim().is_empty() {
            return Err(AppError::config(
                "Allowed origin cannot be empty. Use '*' to allow any origin.",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.weather.api_key = "valid_api_key_123".to_string();
        config.mail.username = "reports@example.com".to_string();
        config.mail.password = "app-password".to_string();
        config.apply_defaults();
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.mail.host, "smtp.gmail.com");
        assert_eq!(config.mail.port, 465);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_empty());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let mut config = valid_config();
        config.weather.api_key = "  ".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Weather API key"));
    }

    #[test]
    fn test_config_validation_missing_mail_credentials() {
        let mut config = valid_config();
        config.mail.password = String::new();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Mail relay credentials"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = valid_config();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_from_address_defaults_to_username() {
        let config = valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.mail.from_address, "reports@example.com");
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let config = valid_config();
        let debug = format!("{config:?}");
        assert!(!debug.contains("valid_api_key_123"));
        assert!(!debug.contains("app-password"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[weather]
api_key = "file_api_key_123"
timeout_seconds = 5

[mail]
username = "reports@example.com"
password = "app-password"
from_name = "Forecasts"

[server]
port = 8080
allowed_origin = "https://weather.example.com"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.api_key, "file_api_key_123");
        assert_eq!(config.weather.timeout_seconds, 5);
        assert_eq!(config.mail.from_name, "Forecasts");
        assert_eq!(config.mail.from_address, "reports@example.com");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.allowed_origin, "https://weather.example.com");
        assert_eq!(config.logging.format, "pretty");
    }
}
