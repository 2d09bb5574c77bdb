//! Small shared helpers for command output.

use owo_colors::OwoColorize;

/// Human-readable binary size, e.g. `3.6 TiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Colorize a firmware status string when color is enabled.
///
/// Healthy states render green, degraded/dead red, anything else
/// yellow -- the same buckets the web UI uses.
pub fn paint_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_owned();
    }
    match status.to_ascii_lowercase().as_str() {
        "online" | "redundant" | "healthy" | "ok" => status.green().to_string(),
        "degraded" | "dead" | "failed" => status.red().to_string(),
        _ => status.yellow().to_string(),
    }
}
