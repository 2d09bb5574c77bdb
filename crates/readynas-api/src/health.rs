// Enclosure health operations

use tracing::{debug, warn};

use crate::client::ReadyNasClient;
use crate::envelope::Resource;
use crate::error::Error;
use crate::models::{HealthInfo, HealthReport};
use crate::parse;

impl ReadyNasClient {
    /// Fetch the enclosure health collection: CPU temperature, fan
    /// speed, and per-bay disk status.
    pub async fn get_health(&self) -> Result<HealthInfo, Error> {
        self.read_resource(Resource::Health, parse::parse_health)
            .await
    }

    /// One full poll cycle: health, volumes, and system info read
    /// sequentially and merged into a [`HealthReport`].
    ///
    /// A failing sub-read leaves its section absent instead of failing
    /// the whole report — partial data every cycle beats no data. The
    /// host should treat [`HealthReport::is_empty`] as "device
    /// unavailable".
    pub async fn get_health_report(&self) -> HealthReport {
        debug!(host = self.host(), "starting poll cycle");
        let mut report = HealthReport::default();

        match self.get_health().await {
            Ok(health) => {
                report.fan_speed = health.fan_speed;
                report.cpu_temp = health.cpu_temp;
                report.disks = health.disks;
            }
            Err(e) => warn!(error = %e, "health read failed, omitting enclosure data"),
        }

        match self.get_volumes().await {
            Ok(volumes) => report.volumes = Some(volumes),
            Err(e) => warn!(error = %e, "volume read failed, omitting volumes"),
        }

        match self.get_system_info().await {
            Ok(info) => report.os_data = Some(info),
            Err(e) => warn!(error = %e, "system info read failed, omitting os data"),
        }

        report
    }
}
