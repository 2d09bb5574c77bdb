//! Health report command handler.

use tabled::Tabled;

use readynas_api::{DiskInfo, HealthReport, ReadyNasClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;
use super::volumes::VolumeRow;

#[derive(Tabled)]
struct DiskRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Temp (°C)")]
    temperature: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
}

impl DiskRow {
    fn new(disk: &DiskInfo, color: bool) -> Self {
        Self {
            model: disk.model.clone(),
            status: util::paint_status(&disk.status, color),
            temperature: disk.temperature.map_or_else(|| "-".into(), |t| t.to_string()),
            capacity: disk.capacity.map_or_else(|| "-".into(), util::format_bytes),
        }
    }
}

fn detail(report: &HealthReport, color: bool) -> String {
    let mut sections = vec![format!(
        "CPU temp:  {}\nFan speed: {}",
        report
            .cpu_temp
            .map_or_else(|| "-".into(), |t| format!("{t} °C")),
        report
            .fan_speed
            .map_or_else(|| "-".into(), |s| format!("{s} RPM")),
    )];

    if !report.disks.is_empty() {
        let rows: Vec<DiskRow> = report
            .disks
            .iter()
            .map(|d| DiskRow::new(d, color))
            .collect();
        sections.push(output::render_table(&rows));
    }

    if let Some(ref volumes) = report.volumes {
        let rows: Vec<VolumeRow> = volumes.iter().map(VolumeRow::from).collect();
        sections.push(output::render_table(&rows));
    }

    if let Some(ref os) = report.os_data {
        sections.push(format!(
            "Model: {}  Firmware: {} {}",
            os.model, os.firmware_name, os.firmware_version
        ));
    }

    sections.join("\n")
}

fn plain(report: &HealthReport) -> String {
    let mut lines = Vec::new();
    if let Some(t) = report.cpu_temp {
        lines.push(format!("cpu_temp {t}"));
    }
    if let Some(s) = report.fan_speed {
        lines.push(format!("fan_speed {s}"));
    }
    for disk in &report.disks {
        lines.push(format!("disk {} {}", disk.model, disk.status));
    }
    if let Some(ref volumes) = report.volumes {
        for v in volumes {
            lines.push(format!("volume {} {}", v.name, v.health));
        }
    }
    lines.join("\n")
}

pub async fn handle(client: &ReadyNasClient, global: &GlobalOpts) -> Result<(), CliError> {
    let report = client.get_health_report().await;

    if report.is_empty() {
        return Err(CliError::NoData {
            operation: "health".into(),
        });
    }

    let color = output::should_color(&global.color);
    let rendered = output::render_single(&global.output, &report, |r| detail(r, color), plain);
    output::print_output(&rendered, global.quiet);
    Ok(())
}
