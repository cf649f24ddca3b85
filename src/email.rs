//! Mail relay capability and the SMTP implementation
//!
//! The dispatcher only talks to [`MailRelay`]; [`SmtpRelay`] is the
//! production relay built on lettre.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    Message, Transport,
    message::{Mailbox, MultiPart},
    transport::smtp::{self, SmtpTransport, authentication::Credentials, response::Code},
};
use tracing::{debug, info};

use crate::config::MailConfig;
use crate::error::{RelayError, RelayErrorKind};

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Anything that can deliver one message
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError>;
}

/// SMTP relay over implicit TLS
///
/// Credentials are fixed when the relay is built.
#[derive(Clone)]
pub struct SmtpRelay {
    transport: SmtpTransport,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("from", &self.from.email.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpRelay {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = SmtpTransport::relay(&config.host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.host))?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.timeout_seconds.into())))
            .build();

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .context("Failed to parse from address")?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, RelayError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| RelayError::recipient_rejected(format!("unparsable recipient: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| {
                RelayError::new(
                    RelayErrorKind::RecipientRejected,
                    "the message could not be composed",
                    e.to_string(),
                )
            })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError> {
        let message = self.build_message(email)?;
        let transport = self.transport.clone();

        debug!("Submitting message to SMTP relay");
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| RelayError::transport(format!("send task failed: {e}")))?
            .map_err(|e| classify_smtp_error(&e))?;

        info!("SMTP relay accepted message with status {}", response.code());
        Ok(())
    }
}

fn classify_smtp_error(error: &smtp::Error) -> RelayError {
    classify(
        error.status().and_then(status_code),
        error.is_permanent(),
        error.to_string(),
    )
}

/// Three-digit SMTP reply code
fn status_code(code: Code) -> Option<u16> {
    code.to_string().parse().ok()
}

/// Sort a relay failure by its SMTP status: 530/534/535 are credential
/// failures, other permanent replies reject the message, and anything else
/// (transient replies, no reply at all) is a transport failure.
fn classify(status: Option<u16>, permanent: bool, diagnostic: String) -> RelayError {
    match status {
        Some(530 | 534 | 535) => RelayError::authentication(diagnostic),
        Some(_) if permanent => RelayError::recipient_rejected(diagnostic),
        _ => RelayError::transport(diagnostic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::transport::smtp::response::{Category, Detail, Severity};
    use rstest::rstest;

    fn config() -> MailConfig {
        MailConfig {
            username: "reports@example.com".to_string(),
            password: "app-password".to_string(),
            from_address: "reports@example.com".to_string(),
            ..MailConfig::default()
        }
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Weather Report for London".to_string(),
            html: "<p>21°C</p>".to_string(),
            text: "21°C".to_string(),
        }
    }

    #[test]
    fn test_relay_builds_from_config() {
        let relay = SmtpRelay::new(&config()).unwrap();
        let debug = format!("{relay:?}");
        assert!(debug.contains("reports@example.com"));
        assert!(!debug.contains("app-password"));
    }

    #[test]
    fn test_message_uses_configured_sender() {
        let relay = SmtpRelay::new(&config()).unwrap();
        let message = relay.build_message(&email("alice@example.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Weather Mailer"));
        assert!(formatted.contains("<reports@example.com>"));
        assert!(formatted.contains("To: alice@example.com"));
        assert!(formatted.contains("Subject: Weather Report for London"));
        assert!(formatted.contains("multipart/alternative"));
    }

    #[rstest]
    #[case::bad_credentials(Some(535), true, RelayErrorKind::Authentication)]
    #[case::auth_required(Some(530), true, RelayErrorKind::Authentication)]
    #[case::auth_mechanism(Some(534), true, RelayErrorKind::Authentication)]
    #[case::mailbox_unavailable(Some(550), true, RelayErrorKind::RecipientRejected)]
    #[case::bad_recipient_syntax(Some(553), true, RelayErrorKind::RecipientRejected)]
    #[case::greylisted(Some(451), false, RelayErrorKind::Transport)]
    #[case::mailbox_busy(Some(450), false, RelayErrorKind::Transport)]
    #[case::connection_failed(None, false, RelayErrorKind::Transport)]
    #[case::permanent_without_status(None, true, RelayErrorKind::Transport)]
    fn test_classify(
        #[case] status: Option<u16>,
        #[case] permanent: bool,
        #[case] expected: RelayErrorKind,
    ) {
        let err = classify(status, permanent, "raw relay output".to_string());
        assert_eq!(err.kind, expected);
        assert_eq!(err.diagnostic, "raw relay output");
        assert!(!err.reason.contains("raw relay output"));
    }

    #[test]
    fn test_status_code_from_reply() {
        let code = Code::new(
            Severity::PermanentNegativeCompletion,
            Category::Unspecified3,
            Detail::Five,
        );
        assert_eq!(status_code(code), Some(535));
    }

    #[test]
    fn test_unparsable_recipient_is_rejected() {
        let relay = SmtpRelay::new(&config()).unwrap();
        let err = relay.build_message(&email("not an address")).unwrap_err();
        assert_eq!(err.kind, RelayErrorKind::RecipientRejected);
    }
}
