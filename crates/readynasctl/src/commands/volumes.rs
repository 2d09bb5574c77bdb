//! Volume command handler.

use tabled::Tabled;

use readynas_api::{ReadyNasClient, VolumeInfo};

use crate::cli::GlobalOpts;
use crate::error::{CliError, from_api_error};
use crate::output;

#[derive(Tabled)]
pub(crate) struct VolumeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "RAID")]
    raid: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Capacity (GB)")]
    capacity: String,
    #[tabled(rename = "Free (GB)")]
    free: String,
    #[tabled(rename = "Used (GB)")]
    used: String,
    #[tabled(rename = "Used %")]
    used_pct: String,
}

impl From<&VolumeInfo> for VolumeRow {
    fn from(v: &VolumeInfo) -> Self {
        Self {
            name: v.name.clone(),
            raid: v.raid_level.clone(),
            health: v.health.clone(),
            capacity: format!("{:.2}", v.capacity_gb),
            free: format!("{:.2}", v.free_gb),
            used: format!("{:.2}", v.used_gb),
            used_pct: format!("{:.1}", v.used_percentage),
        }
    }
}

pub async fn handle(client: &ReadyNasClient, global: &GlobalOpts) -> Result<(), CliError> {
    let volumes = client
        .get_volumes()
        .await
        .map_err(|e| from_api_error(e, client.host()))?;

    let rendered = output::render_list(
        &global.output,
        &volumes,
        |v| VolumeRow::from(v),
        |v| v.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
