use std::sync::Arc;

use anyhow::{Context, Result};
use weather_mailer::{
    AppConfig, ReportDispatcher, SmtpRelay, WeatherLookupClient, api::AppState, telemetry, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    tracing::debug!("Loaded configuration: {:?}", config);

    let weather = WeatherLookupClient::new(&config.weather)?;
    let relay = SmtpRelay::new(&config.mail)?;
    let state = AppState {
        weather,
        dispatcher: ReportDispatcher::new(Arc::new(relay)),
    };

    web::run(state, &config.server).await
}
