// dbbroker HTTP client
//
// Wraps `reqwest::Client` with ReadyNAS-specific URL construction,
// Basic-auth header encoding, CSRF token caching, and the shared
// read-with-retry loop. Resource operations (health, volumes, system,
// fan) are implemented as inherent methods in their own files to keep
// this module focused on transport mechanics.

use std::sync::RwLock;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::envelope::{self, Resource};
use crate::error::{Error, body_preview};
use crate::transport::{TlsMode, TransportConfig};

/// Reads re-request up to this many times before giving up.
const READ_ATTEMPTS: u32 = 3;
/// Fixed pause between attempts after an empty body or decode failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connection settings for one ReadyNAS device.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Hostname or IP, optionally with a port (`nas.local`, `10.0.0.4:8080`).
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Talk HTTPS instead of HTTP.
    pub use_ssl: bool,
    /// Skip certificate verification. ReadyNAS units ship self-signed.
    pub ignore_ssl_errors: bool,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config with the protocol defaults: plain HTTP, certificate
    /// verification off, 30-second request timeout.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            use_ssl: false,
            ignore_ssl_errors: true,
            timeout: Duration::from_secs(30),
        }
    }

    /// URL scheme implied by `use_ssl`.
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl { "https" } else { "http" }
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.ignore_ssl_errors {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: self.timeout,
        }
    }
}

/// Client for the ReadyNAS local management protocol.
///
/// Owns the session state: derived broker/admin URLs and the cached
/// CSRF token. The token is fetched lazily on the first read, cleared
/// whenever the device answers 401/403, and refreshed on the next
/// attempt. Calls are expected to be issued sequentially -- the device
/// serves one admin session, so overlapping polls gain nothing.
pub struct ReadyNasClient {
    http: reqwest::Client,
    host: String,
    username: String,
    password: SecretString,
    broker_url: Url,
    admin_url: Url,
    /// Session CSRF token scraped from the admin page. `None` until the
    /// first successful fetch and after a 401/403 response.
    csrf_token: RwLock<Option<String>>,
}

impl ReadyNasClient {
    /// Create a client from a [`ClientConfig`]. No network I/O happens
    /// here; the first request triggers token acquisition.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport().build_client()?;
        Self::with_client(http, config)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when the transport needs settings beyond
    /// [`TransportConfig`] (proxies, extra root certs).
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        let scheme = config.scheme();
        let broker_url = Url::parse(&format!("{scheme}://{}/dbbroker", config.host))?;
        let admin_url = Url::parse(&format!("{scheme}://{}/admin/", config.host))?;
        Ok(Self {
            http,
            host: config.host,
            username: config.username,
            password: config.password,
            broker_url,
            admin_url,
            csrf_token: RwLock::new(None),
        })
    }

    /// The device host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The dbbroker RPC endpoint.
    pub fn broker_url(&self) -> &Url {
        &self.broker_url
    }

    /// The admin page used for token acquisition.
    pub fn admin_url(&self) -> &Url {
        &self.admin_url
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// The currently cached session token, if any.
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token.read().expect("CSRF lock poisoned").clone()
    }

    pub(crate) fn set_csrf_token(&self, token: String) {
        debug!("storing CSRF token");
        *self.csrf_token.write().expect("CSRF lock poisoned") = Some(token);
    }

    pub(crate) fn clear_csrf_token(&self) {
        *self.csrf_token.write().expect("CSRF lock poisoned") = None;
    }

    /// Return the cached token, fetching a fresh one if absent.
    pub(crate) async fn cached_or_fetch_token(&self) -> Result<String, Error> {
        if let Some(token) = self.csrf_token() {
            return Ok(token);
        }
        self.fetch_csrf_token().await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `Authorization` header value. Recomputed per request -- cheap,
    /// and it keeps the secret out of long-lived header maps.
    pub(crate) fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", BASE64.encode(credentials))
    }

    /// POST a transaction envelope to the broker endpoint.
    pub(crate) async fn post_broker(
        &self,
        token: &str,
        payload: String,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(self.broker_url.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=UTF-8")
            .header(AUTHORIZATION, self.basic_auth_header())
            .header("csrfpId", token)
            .body(payload)
            .send()
            .await
    }

    /// Shared read loop: token -> POST -> decode, with up to
    /// [`READ_ATTEMPTS`] attempts.
    ///
    /// A 401/403 clears the cached token so the next attempt
    /// re-authenticates immediately; empty bodies and decode failures
    /// wait [`RETRY_DELAY`] first since they usually mean readynasd is
    /// mid-restart. The error from the final attempt is preserved as
    /// the source of [`Error::RetryExhausted`].
    pub(crate) async fn read_resource<T>(
        &self,
        resource: Resource,
        decode: impl Fn(&str) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let operation = resource.name();
        let mut last_error: Option<Error> = None;
        let mut attempts_left = READ_ATTEMPTS;

        while attempts_left > 0 {
            let token = match self.cached_or_fetch_token().await {
                Ok(token) => token,
                Err(e) => {
                    warn!(operation, error = %e, "token acquisition failed");
                    attempts_left -= 1;
                    last_error = Some(e);
                    continue;
                }
            };

            debug!(operation, url = %self.broker_url, "POST");
            let resp = match self.post_broker(&token, envelope::get_request(resource)).await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(operation, error = %e, "transport failure");
                    attempts_left -= 1;
                    last_error = Some(Error::Transport(e));
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            let status = resp.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                debug!(operation, status = status.as_u16(), "session expired, clearing token");
                self.clear_csrf_token();
                attempts_left -= 1;
                last_error = Some(Error::SessionExpired);
                continue;
            }

            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(operation, error = %e, "failed to read response body");
                    attempts_left -= 1;
                    last_error = Some(Error::Transport(e));
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            if body.trim().is_empty() {
                warn!(operation, status = status.as_u16(), "empty response body");
                attempts_left -= 1;
                last_error = Some(Error::EmptyResponse);
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }

            match decode(&body) {
                Ok(data) => return Ok(data),
                Err(e) => {
                    warn!(
                        operation,
                        error = %e,
                        body = body_preview(&body),
                        "failed to decode response"
                    );
                    attempts_left -= 1;
                    last_error = Some(e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }

        Err(Error::RetryExhausted {
            operation,
            attempts: READ_ATTEMPTS,
            source: last_error.map(Box::new),
        })
    }
}
