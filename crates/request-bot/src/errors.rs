//! Platform errors and how they are logged.
//!
//! Every Discord call made during a dispatch pass is single-attempt. A
//! failure ends the current step, gets classified into an [`ErrorOutcome`],
//! and is logged at a level matching its permanence. Nothing is surfaced to
//! users and nothing is retried.

use request_types::errors::DiscordErrorCode;
use serenity::http::HttpError;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Result type alias for platform calls
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Failure of a platform capability call
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Discord API error: {0}")]
    Serenity(serenity::Error),

    /// HTTP 404 from the Discord API
    #[error("Not found [{code:?}]: {message}")]
    NotFound { code: DiscordErrorCode, message: String },

    /// HTTP 403 from the Discord API
    #[error("Forbidden [{code:?}]: {message}")]
    Forbidden { code: DiscordErrorCode, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlatformError {
    /// Map an API rejection with a 404 or 403 status. Other statuses stay
    /// wrapped serenity errors and are classified from the response.
    pub fn rejected(status: u16, raw_code: u32, message: &str) -> Option<Self> {
        let code = DiscordErrorCode::from_raw(raw_code);
        let message = message.to_string();
        match status {
            404 => Some(Self::NotFound { code, message }),
            403 => Some(Self::Forbidden { code, message }),
            _ => None,
        }
    }
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) = &err {
            let rejected = Self::rejected(
                resp.status_code.as_u16(),
                resp.error.code as u32,
                &resp.error.message,
            );
            if let Some(rejected) = rejected {
                return rejected;
            }
        }
        Self::Serenity(err)
    }
}

/// Classified failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Repeating the call cannot succeed (missing resource, permissions, bad payload).
    Permanent { code: DiscordErrorCode, message: String },
    /// The platform may accept the same call later.
    Transient { code: DiscordErrorCode, message: String },
}

impl ErrorOutcome {
    fn new(code: DiscordErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        if code.is_permanent() {
            Self::Permanent { code, message }
        } else {
            Self::Transient { code, message }
        }
    }

    pub fn code(&self) -> DiscordErrorCode {
        match self {
            Self::Permanent { code, .. } | Self::Transient { code, .. } => *code,
        }
    }
}

/// Classify a platform error.
pub fn classify(err: &PlatformError) -> ErrorOutcome {
    match err {
        PlatformError::Serenity(serenity::Error::Http(http_err)) => classify_http(http_err),
        PlatformError::Serenity(other) => {
            ErrorOutcome::new(DiscordErrorCode::NetworkError, other.to_string())
        }
        PlatformError::NotFound { code, message } | PlatformError::Forbidden { code, message } => {
            ErrorOutcome::Permanent {
                code: *code,
                message: message.clone(),
            }
        }
        PlatformError::InvalidInput(what) => {
            ErrorOutcome::new(DiscordErrorCode::InvalidFormBody, what)
        }
    }
}

fn classify_http(http_err: &HttpError) -> ErrorOutcome {
    match http_err {
        HttpError::UnsuccessfulRequest(resp) => {
            let status = resp.status_code.as_u16();
            if status == 429 {
                return ErrorOutcome::new(DiscordErrorCode::RateLimited, resp.error.message.clone());
            }
            if status == 413 {
                return ErrorOutcome::new(
                    DiscordErrorCode::RequestEntityTooLarge,
                    resp.error.message.clone(),
                );
            }

            let raw_code = resp.error.code as u32;
            debug!(
                "Discord API error (HTTP {} / code {}): {}",
                status, raw_code, resp.error.message
            );
            ErrorOutcome::new(DiscordErrorCode::from_raw(raw_code), resp.error.message.clone())
        }
        // Network / request-level failures (not Discord API errors)
        _ => ErrorOutcome::new(DiscordErrorCode::NetworkError, http_err.to_string()),
    }
}

/// Log a platform error at the appropriate level.
///
/// - Permanent errors → `error!`
/// - Transient errors → `warn!`
pub fn log_error(context: &str, err: &PlatformError) {
    log_outcome(context, &classify(err));
}

/// Log a pre-classified outcome.
pub fn log_outcome(context: &str, outcome: &ErrorOutcome) {
    match outcome {
        ErrorOutcome::Permanent { code, message } => {
            error!("{} [{:?}]: {}", context, code, message);
        }
        ErrorOutcome::Transient { code, message } => {
            warn!("{} [{:?}]: {}", context, code, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_maps_missing_resources() {
        let err = PlatformError::rejected(404, 10007, "Unknown Member").unwrap();
        assert!(matches!(
            err,
            PlatformError::NotFound {
                code: DiscordErrorCode::UnknownMember,
                ..
            }
        ));
        assert_eq!(
            classify(&err),
            ErrorOutcome::Permanent {
                code: DiscordErrorCode::UnknownMember,
                message: "Unknown Member".to_string(),
            }
        );
    }

    #[test]
    fn test_rejected_maps_permissions() {
        let err = PlatformError::rejected(403, 50013, "Missing Permissions").unwrap();
        assert!(matches!(err, PlatformError::Forbidden { .. }));
        let outcome = classify(&err);
        assert_eq!(outcome.code(), DiscordErrorCode::MissingPermissions);
        assert!(matches!(outcome, ErrorOutcome::Permanent { .. }));
    }

    #[test]
    fn test_rejected_leaves_other_statuses() {
        assert!(PlatformError::rejected(429, 0, "You are being rate limited").is_none());
        assert!(PlatformError::rejected(500, 0, "Internal Server Error").is_none());
        assert!(PlatformError::rejected(400, 50035, "Invalid Form Body").is_none());
    }

    #[test]
    fn test_not_found_with_unmapped_code_is_still_permanent() {
        let err = PlatformError::rejected(404, 0, "404: Not Found").unwrap();
        let outcome = classify(&err);
        assert_eq!(outcome.code(), DiscordErrorCode::Unknown);
        assert!(matches!(outcome, ErrorOutcome::Permanent { .. }));
    }

    #[test]
    fn test_invalid_input_is_permanent() {
        let outcome = classify(&PlatformError::InvalidInput("bad timestamp".to_string()));
        assert_eq!(outcome.code(), DiscordErrorCode::InvalidFormBody);
        assert!(matches!(outcome, ErrorOutcome::Permanent { .. }));
    }

    #[test]
    fn test_non_http_serenity_error_is_network() {
        let err = PlatformError::from(serenity::Error::Other("socket closed"));
        assert!(matches!(err, PlatformError::Serenity(_)));
        let outcome = classify(&err);
        assert_eq!(outcome.code(), DiscordErrorCode::NetworkError);
        assert!(matches!(outcome, ErrorOutcome::Transient { .. }));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NotFound {
                code: DiscordErrorCode::UnknownMessage,
                message: "message 1".to_string(),
            }
            .to_string(),
            "Not found [UnknownMessage]: message 1"
        );
        assert_eq!(
            PlatformError::InvalidInput("nothing to relay".to_string()).to_string(),
            "Invalid input: nothing to relay"
        );
    }
}
