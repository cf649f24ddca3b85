//! Email report dispatch
//!
//! A dispatch moves through `Validating → Rendering → Sending` and ends as
//! [`DispatchResult::Rejected`], [`DispatchResult::Sent`] or
//! [`DispatchResult::Failed`]. Validation failures never reach the relay, and
//! a passing request causes exactly one relay call.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::email::{MailRelay, OutgoingEmail};
use crate::models::ReportRequest;

pub mod render;

pub use render::{RenderedReport, render_report};

pub const CONFIRMATION_MESSAGE: &str = "Email sent successfully!";

const MAX_DETAIL_CHARS: usize = 200;

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Sent { confirmation_message: String },
    Rejected { reason: String },
    Failed { detail: String },
}

impl DispatchResult {
    /// Caller-facing message for this outcome
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            DispatchResult::Sent {
                confirmation_message,
            } => confirmation_message,
            DispatchResult::Rejected { reason } => reason,
            DispatchResult::Failed { detail } => detail,
        }
    }
}

/// Validates, renders and sends weather reports through a [`MailRelay`]
#[derive(Clone)]
pub struct ReportDispatcher {
    relay: Arc<dyn MailRelay>,
}

impl std::fmt::Debug for ReportDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportDispatcher").finish_non_exhaustive()
    }
}

impl ReportDispatcher {
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        Self { relay }
    }

    #[instrument(skip_all, fields(location = request.location.as_deref().unwrap_or_default()))]
    pub async fn dispatch(&self, request: &ReportRequest) -> DispatchResult {
        debug!("Validating report request");
        let (recipient, summary) = match request.validate() {
            Ok(valid) => valid,
            Err(rejection) => {
                info!("Rejected report request: {}", rejection);
                return DispatchResult::Rejected {
                    reason: rejection.reason().to_string(),
                };
            }
        };

        debug!("Rendering report");
        let report = render_report(&recipient, &summary);

        let email = OutgoingEmail {
            to: recipient.to_string(),
            subject: report.subject,
            html: report.html,
            text: report.text,
        };

        debug!("Sending report");
        match self.relay.send(&email).await {
            Ok(()) => {
                info!("Weather report for '{}' sent", summary.location);
                DispatchResult::Sent {
                    confirmation_message: CONFIRMATION_MESSAGE.to_string(),
                }
            }
            Err(err) => {
                warn!(
                    kind = ?err.kind,
                    diagnostic = %err.diagnostic,
                    "Mail relay failed to send weather report"
                );
                DispatchResult::Failed {
                    detail: format!("Error sending email: {}", sanitize_reason(&err.reason)),
                }
            }
        }
    }
}

/// First line of `reason`, without control characters, capped in length
fn sanitize_reason(reason: &str) -> String {
    let line = reason.lines().next().unwrap_or_default();
    let cleaned: String = line
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_DETAIL_CHARS)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "unknown mail relay error".to_string()
    } else {
        cleaned.to_string()
    }
}
