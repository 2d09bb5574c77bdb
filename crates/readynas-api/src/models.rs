// Data model for dbbroker responses.
//
// Every poll rebuilds these from scratch — nothing here is cached or
// merged with prior state. Fields the firmware omits default to
// "Unknown" / `None`, matching what the web UI displays for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Fan mode ─────────────────────────────────────────────────────────

/// Chassis fan profile as reported (and accepted) by readynasd.
///
/// `Unknown` only ever appears on the read path — trying to *set* it
/// is rejected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Cool,
    Balanced,
    Quiet,
    Unknown,
}

impl FanMode {
    /// Wire value for the `mode` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cool => "cool",
            Self::Balanced => "balanced",
            Self::Quiet => "quiet",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the firmware accepts this value in a set request.
    pub fn is_settable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cool" => Ok(Self::Cool),
            "balanced" => Ok(Self::Balanced),
            "quiet" => Ok(Self::Quiet),
            other => Err(Error::InvalidFanMode {
                value: other.to_owned(),
            }),
        }
    }
}

// ── Enclosure health ─────────────────────────────────────────────────

/// Snapshot of the enclosure health collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Chassis fan speed in RPM, if the enclosure reports a fan.
    pub fan_speed: Option<u32>,
    /// CPU/board temperature in °C.
    pub cpu_temp: Option<i32>,
    /// One entry per populated disk bay, across all enclosures.
    pub disks: Vec<DiskInfo>,
}

/// A single disk bay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    pub model: String,
    /// Drive temperature in °C.
    pub temperature: Option<i32>,
    /// Firmware status string, e.g. `ONLINE`.
    pub status: String,
    /// Raw capacity in bytes.
    pub capacity: Option<u64>,
}

// ── Volumes ──────────────────────────────────────────────────────────

/// A data volume with its RAID layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    pub raid_level: String,
    /// Firmware health string, e.g. `Redundant` or `Degraded`.
    pub health: String,
    pub capacity_gb: f64,
    pub free_gb: f64,
    pub used_gb: f64,
    /// `used_gb / capacity_gb`, rounded to one decimal. `0` when the
    /// volume reports zero capacity.
    pub used_percentage: f64,
    pub encryption_enabled: bool,
    pub auto_expand: bool,
    pub quota_enabled: bool,
    pub raid_configs: Vec<RaidConfig>,
}

/// A redundancy group within a volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidConfig {
    pub level: String,
    pub id: String,
    /// Resource ids of the member disks.
    pub disks: Vec<String>,
}

// ── System info ──────────────────────────────────────────────────────

/// OS-level device identity from the `SystemInfo` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub model: String,
    pub firmware_name: String,
    pub firmware_version: String,
    pub serial_number: String,
    pub uptime: String,
    pub mac_address: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            model: unknown(),
            firmware_name: unknown(),
            firmware_version: unknown(),
            serial_number: unknown(),
            uptime: unknown(),
            mac_address: unknown(),
        }
    }
}

pub(crate) fn unknown() -> String {
    "Unknown".to_owned()
}

// ── Aggregate report ─────────────────────────────────────────────────

/// Merged result of one full poll cycle.
///
/// Sections whose read failed are simply absent — a partial report is
/// not an error. Only a report where *everything* is missing should be
/// treated as the device being unreachable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub fan_speed: Option<u32>,
    pub cpu_temp: Option<i32>,
    #[serde(default)]
    pub disks: Vec<DiskInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_data: Option<SystemInfo>,
}

impl HealthReport {
    /// `true` when no section of the poll produced data.
    pub fn is_empty(&self) -> bool {
        self.fan_speed.is_none()
            && self.cpu_temp.is_none()
            && self.disks.is_empty()
            && self.volumes.is_none()
            && self.os_data.is_none()
    }
}
