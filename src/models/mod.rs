//! Data models for the weather mailer service
//!
//! This module contains the value objects passed between components:
//! - Location: the user's location query
//! - Weather: the normalized weather summary
//! - Report: email report requests and validated addresses

pub mod location;
pub mod report;
pub mod weather;

// Re-export all public types for convenient access
pub use location::LocationQuery;
pub use report::{EmailAddress, ReportRequest};
pub use weather::WeatherSummary;
