//! Weather Mailer - current weather lookups and emailed weather reports
//!
//! This library provides the weather lookup client, the report dispatcher and
//! the HTTP API that exposes both.

pub mod api;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod report;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use email::{MailRelay, OutgoingEmail, SmtpRelay};
pub use error::{AppError, LookupError, RelayError, RelayErrorKind};
pub use models::{EmailAddress, LocationQuery, ReportRequest, WeatherSummary};
pub use report::{DispatchResult, ReportDispatcher};
pub use weather::{WeatherIcon, WeatherLookupClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
