//! Error types and handling for the weather mailer service

use thiserror::Error;

/// Failure of a weather lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The location query was empty; no request was made
    #[error("Invalid query: location must not be empty")]
    InvalidQuery,

    /// The weather provider answered with a non-OK status
    #[error("Provider error: {message}")]
    ProviderError {
        /// Provider status code, when it reported a numeric one
        code: Option<u16>,
        message: String,
    },

    /// Network, timeout or response parsing failure
    #[error("Transport error: {message}")]
    TransportError { message: String },
}

impl LookupError {
    /// Create a new provider error
    pub fn provider<S: Into<String>>(code: Option<u16>, message: S) -> Self {
        Self::ProviderError {
            code,
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LookupError::InvalidQuery => "Enter a city name.".to_string(),
            LookupError::ProviderError { message, .. } => message.clone(),
            LookupError::TransportError { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
        }
    }
}

/// Category of a mail relay failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayErrorKind {
    /// The relay refused the recipient or the message
    RecipientRejected,
    /// The relay refused our credentials
    Authentication,
    /// Connection, TLS or timeout failure
    Transport,
}

/// Failure reported by a mail relay
///
/// `reason` is a short message safe to show to the caller. `diagnostic` holds
/// whatever the transport reported and is only ever logged.
#[derive(Error, Debug, Clone)]
#[error("{reason}")]
pub struct RelayError {
    pub kind: RelayErrorKind,
    pub reason: String,
    pub diagnostic: String,
}

impl RelayError {
    pub fn new<R: Into<String>, D: Into<String>>(
        kind: RelayErrorKind,
        reason: R,
        diagnostic: D,
    ) -> Self {
        Self {
            kind,
            reason: reason.into(),
            diagnostic: diagnostic.into(),
        }
    }

    pub fn recipient_rejected<D: Into<String>>(diagnostic: D) -> Self {
        Self::new(
            RelayErrorKind::RecipientRejected,
            "the recipient address was rejected",
            diagnostic,
        )
    }

    pub fn authentication<D: Into<String>>(diagnostic: D) -> Self {
        Self::new(
            RelayErrorKind::Authentication,
            "the mail relay refused the sender credentials",
            diagnostic,
        )
    }

    pub fn transport<D: Into<String>>(diagnostic: D) -> Self {
        Self::new(
            RelayErrorKind::Transport,
            "the mail relay could not be reached",
            diagnostic,
        )
    }
}

/// Startup and process-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP server errors
    #[error("Server error: {message}")]
    Server { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}
