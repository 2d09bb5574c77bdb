// Fan profile operations

use reqwest::StatusCode;
use tracing::info;

use crate::client::ReadyNasClient;
use crate::envelope::{self, Resource};
use crate::error::Error;
use crate::models::FanMode;
use crate::parse;

impl ReadyNasClient {
    /// Read the active fan profile. [`FanMode::Unknown`] when the
    /// firmware reports a value outside the known set.
    pub async fn get_fan_mode(&self) -> Result<FanMode, Error> {
        self.read_resource(Resource::FanMode, parse::parse_fan_mode)
            .await
    }

    /// Change the fan profile. Exactly one POST, success iff the device
    /// answers 200 — a rejected set is surfaced, never retried.
    ///
    /// [`FanMode::Unknown`] is refused before any network call.
    pub async fn set_fan_mode(&self, mode: FanMode) -> Result<(), Error> {
        if !mode.is_settable() {
            return Err(Error::InvalidFanMode {
                value: mode.to_string(),
            });
        }

        let token = self.cached_or_fetch_token().await?;
        let resp = self
            .post_broker(&token, envelope::set_fan_mode_request(mode))
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Rejected {
                status: status.as_u16(),
            });
        }

        info!(host = self.host(), %mode, "fan mode changed");
        Ok(())
    }
}
