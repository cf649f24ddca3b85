use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::LookupError,
    models::{ReportRequest, WeatherSummary},
    report::{DispatchResult, ReportDispatcher},
    weather::WeatherLookupClient,
};

/// Shared handles for the request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub weather: WeatherLookupClient,
    pub dispatcher: ReportDispatcher,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub location: String,
}

type ApiError = (StatusCode, Json<MessageResponse>);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/weather", get(get_weather))
        .route("/send-email", post(send_email))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Hello, world!"
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSummary>, ApiError> {
    state
        .weather
        .lookup(&params.location)
        .await
        .map(Json)
        .map_err(|err| (lookup_status(&err), MessageResponse::new(err.user_message())))
}

fn lookup_status(err: &LookupError) -> StatusCode {
    match err {
        LookupError::InvalidQuery => StatusCode::BAD_REQUEST,
        LookupError::ProviderError {
            code: Some(404), ..
        } => StatusCode::NOT_FOUND,
        LookupError::ProviderError { .. } | LookupError::TransportError { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> (StatusCode, Json<MessageResponse>) {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("Unreadable send-email body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                MessageResponse::new("invalid request body"),
            );
        }
    };

    let result = state.dispatcher.dispatch(&request).await;
    let status = match result {
        DispatchResult::Sent { .. } => StatusCode::OK,
        DispatchResult::Rejected { .. } => StatusCode::BAD_REQUEST,
        DispatchResult::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, MessageResponse::new(result.message()))
}
