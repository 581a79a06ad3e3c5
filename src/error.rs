//! Error types for calls against the game service.

use derive_more::{Display, Error};
use tracing::instrument;

/// Why a service call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ApiErrorKind {
    /// The service answered `success: false` (illegal move, unknown game, ...).
    #[display("rejected")]
    Rejected,
    /// No usable answer: connection failure, timeout, or an unparseable body.
    #[display("transport")]
    Transport,
}

/// Service call error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("API {} error: {} at {}:{}", kind, message, file, line)]
pub struct ApiError {
    /// Failure class.
    pub kind: ApiErrorKind,
    /// Error message. For rejections this is the service's text, verbatim.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ApiError {
    /// Creates an error of the given kind with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The service refused the request.
    #[track_caller]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, message)
    }

    /// The request did not produce a usable response.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// True for domain rejections.
    pub fn is_rejection(&self) -> bool {
        self.kind == ApiErrorKind::Rejected
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::transport(format!("Invalid JSON response: {}", err))
    }
}
