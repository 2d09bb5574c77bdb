//! Periodic poll loop.
//!
//! Reads the aggregate health report on a fixed cadence and prints one
//! entry per tick. A failed cycle is reported and skipped -- the loop
//! only stops on Ctrl-C or after `--count` polls. Polls are strictly
//! sequential; a slow device delays the next tick rather than
//! overlapping it.

use std::time::Duration;

use owo_colors::OwoColorize;

use readynas_api::{HealthReport, ReadyNasClient};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

fn summary_line(poll: u64, report: &HealthReport, color: bool) -> String {
    let cpu = report
        .cpu_temp
        .map_or_else(|| "-".into(), |t| format!("{t}°C"));
    let fan = report
        .fan_speed
        .map_or_else(|| "-".into(), |s| format!("{s}rpm"));

    let volumes = report.volumes.as_ref().map_or_else(
        || "-".into(),
        |vols| {
            let degraded = vols.iter().filter(|v| v.health != "Redundant").count();
            if degraded > 0 && color {
                format!("{} ({} degraded)", vols.len(), degraded).red().to_string()
            } else if degraded > 0 {
                format!("{} ({} degraded)", vols.len(), degraded)
            } else {
                vols.len().to_string()
            }
        },
    );

    format!(
        "[{poll}] cpu {cpu}  fan {fan}  disks {}  volumes {volumes}",
        report.disks.len()
    )
}

pub async fn handle(
    client: &ReadyNasClient,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = Duration::from_secs(args.interval.max(1));
    let color = output::should_color(&global.color);
    let mut polls: u64 = 0;

    loop {
        let report = client.get_health_report().await;
        polls += 1;

        if report.is_empty() {
            // Failure mode is "no data this cycle", never a dead loop.
            eprintln!("[{polls}] no data this cycle");
        } else {
            // One entry per tick: pretty JSON would interleave badly.
            let format = match global.output {
                OutputFormat::Json => OutputFormat::JsonCompact,
                ref other => other.clone(),
            };
            let line = output::render_single(
                &format,
                &report,
                |r| summary_line(polls, r, color),
                |r| summary_line(polls, r, color),
            );
            output::print_output(&line, global.quiet);
        }

        if let Some(count) = args.count {
            if polls >= count {
                break;
            }
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
