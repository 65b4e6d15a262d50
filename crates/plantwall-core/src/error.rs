// ── Core error types ──
//
// User-facing errors from plantwall-core. Consumers never match on raw
// reqwest errors; the `From<plantwall_api::Error>` impl folds transport
// failures into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if the backend answered at all).
        status: Option<u16>,
    },

    /// The write returned 2xx but with a status token the endpoint does
    /// not accept as success.
    #[error("Unexpected response from server")]
    UnexpectedResponse { status: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Emergency stop is active")]
    EmergencyStop,

    #[error("Another update is already in progress")]
    Busy,

    #[error("Panel has been unmounted")]
    Unmounted,

    #[error("Panel is already mounted")]
    AlreadyMounted,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<plantwall_api::Error> for CoreError {
    fn from(err: plantwall_api::Error) -> Self {
        match err {
            plantwall_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: err.status(),
                    }
                }
            }
            plantwall_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            plantwall_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            plantwall_api::Error::ClientBuild(message) => CoreError::Config { message },
            plantwall_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            plantwall_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_keep_backend_message() {
        let err = CoreError::from(plantwall_api::Error::Http {
            status: 500,
            message: "Failed to find watering pin".into(),
        });
        assert_eq!(err.to_string(), "Failed to find watering pin");
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn api_timeouts_are_unreachable() {
        let err = CoreError::from(plantwall_api::Error::Timeout { timeout_secs: 10 });
        assert!(err.is_unreachable());
        assert_eq!(err.to_string(), "Backend request timed out after 10s");
    }

    #[test]
    fn unexpected_response_reads_as_banner_text() {
        let err = CoreError::UnexpectedResponse {
            status: "queued".into(),
        };
        assert_eq!(
            format!("Failed to start watering: {err}"),
            "Failed to start watering: Unexpected response from server"
        );
    }
}
