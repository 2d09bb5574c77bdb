use thiserror::Error;

/// Top-level error type for the `readynas-api` crate.
///
/// Covers every failure mode of the dbbroker protocol: token
/// acquisition, transport, XML decoding, and command rejection.
/// Consumers typically only branch on [`Error::Authentication`]
/// (bad credentials) versus everything else ("no data this cycle").
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The admin page rejected our Basic-auth credentials (HTTP 401).
    /// Not recoverable without new credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The admin page came back without the expected `csrfInsert`
    /// script fragment, so no session token could be extracted.
    #[error("CSRF token not found in admin page response")]
    CsrfTokenMissing,

    /// An operation came back 401/403 — the session token is stale.
    /// Recovered internally by clearing the token and re-fetching.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error (malformed host in the client config).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The device returned an empty or whitespace-only body.
    /// Happens transiently while readynasd is (re)starting.
    #[error("Empty response from device")]
    EmptyResponse,

    /// XML decoding failed, with a truncated body preview for debugging.
    #[error("XML decode error: {message}")]
    Xml { message: String },

    /// The device answered with an unexpected HTTP status.
    #[error("Device rejected request (HTTP {status})")]
    Rejected { status: u16 },

    // ── Client-side ─────────────────────────────────────────────────
    /// Fan mode outside the set accepted by the firmware.
    /// Raised before any network call is made.
    #[error("Invalid fan mode '{value}' (expected cool, balanced, or quiet)")]
    InvalidFanMode { value: String },

    /// A read operation failed on every attempt of its retry loop.
    /// Carries the error from the final attempt.
    #[error("{operation} failed after {attempts} attempts")]
    RetryExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Option<Box<Error>>,
    },
}

impl Error {
    /// Returns `true` if this error indicates the session token has
    /// expired and a token refresh might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::EmptyResponse | Self::Xml { .. } | Self::SessionExpired => true,
            _ => false,
        }
    }
}

/// Truncate a response body for inclusion in error messages and logs.
pub(crate) fn body_preview(body: &str) -> &str {
    let cut = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..cut]
}
