// readynas-api: Async Rust client for the NETGEAR ReadyNAS local
// management protocol (Basic auth + scraped CSRF token, XML
// transactions against /dbbroker).

mod auth;
pub mod client;
mod envelope;
pub mod error;
mod fan;
mod health;
pub mod models;
mod parse;
mod system;
pub mod transport;
mod volumes;

pub use client::{ClientConfig, ReadyNasClient};
pub use error::Error;
pub use models::{
    DiskInfo, FanMode, HealthInfo, HealthReport, RaidConfig, SystemInfo, VolumeInfo,
};
pub use transport::{TlsMode, TransportConfig};
