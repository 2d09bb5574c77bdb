// CSRF token acquisition
//
// readynasd has no token endpoint: the session token is embedded in a
// script fragment on the admin landing page and must be scraped out.
// The same Basic-auth header used for RPCs authenticates the page GET.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

use crate::client::ReadyNasClient;
use crate::error::{Error, body_preview};

/// The admin page inserts the token via
/// `csrfInsert("csrfpId", "<token>");` — fixed across firmware 6.x.
static CSRF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"csrfInsert\("csrfpId", "([^"]+)"\);"#).expect("CSRF pattern is valid")
});

/// Extract the session token from admin page HTML.
pub(crate) fn extract_csrf_token(html: &str) -> Option<&str> {
    CSRF_PATTERN
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl ReadyNasClient {
    /// Fetch a fresh CSRF token from the admin page and cache it.
    ///
    /// A 401 here means the credentials themselves are bad -- no amount
    /// of token refreshing will recover, so it surfaces as
    /// [`Error::Authentication`] rather than [`Error::SessionExpired`].
    pub(crate) async fn fetch_csrf_token(&self) -> Result<String, Error> {
        debug!(url = %self.admin_url(), "fetching CSRF token");

        let resp = self
            .http_get_admin()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "admin page rejected credentials (HTTP 401)".into(),
            });
        }

        let body = resp.text().await?;
        match extract_csrf_token(&body) {
            Some(token) => {
                debug!("CSRF token acquired");
                self.set_csrf_token(token.to_owned());
                Ok(token.to_owned())
            }
            None => {
                warn!(body = body_preview(&body), "CSRF token pattern not found");
                Err(Error::CsrfTokenMissing)
            }
        }
    }

    async fn http_get_admin(&self) -> Result<reqwest::Response, Error> {
        let resp = self
            .http()
            .get(self.admin_url().clone())
            .header(AUTHORIZATION, self.basic_auth_header())
            .send()
            .await?;
        Ok(resp)
    }
}
