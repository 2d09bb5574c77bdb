// System-level operations: OS info and shutdown.

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::client::ReadyNasClient;
use crate::envelope::{self, Resource};
use crate::error::Error;
use crate::models::SystemInfo;
use crate::parse;

impl ReadyNasClient {
    /// Fetch OS-level device identity: model, firmware, serial, uptime,
    /// MAC address.
    pub async fn get_system_info(&self) -> Result<SystemInfo, Error> {
        self.read_resource(Resource::SystemInfo, parse::parse_system_info)
            .await
    }

    /// Issue an orderly shutdown (`Halt` with `fsck` disabled).
    ///
    /// At most one shutdown command goes out per call: a destructive
    /// operation is never retried transparently. On a 401 the cached
    /// token is cleared and refreshed once so a caller-level retry
    /// starts authenticated, but *this* call still fails with
    /// [`Error::SessionExpired`].
    pub async fn shutdown(&self) -> Result<(), Error> {
        let token = self.cached_or_fetch_token().await?;

        debug!(url = %self.broker_url(), "sending shutdown command");
        let resp = self
            .post_broker(&token, envelope::shutdown_request())
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.clear_csrf_token();
            if let Err(e) = self.fetch_csrf_token().await {
                debug!(error = %e, "token refresh after shutdown 401 failed");
            }
            return Err(Error::SessionExpired);
        }

        if status != StatusCode::OK {
            return Err(Error::Rejected {
                status: status.as_u16(),
            });
        }

        info!(host = self.host(), "shutdown command accepted");
        Ok(())
    }
}
