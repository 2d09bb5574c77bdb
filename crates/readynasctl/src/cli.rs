//! Clap derive structures for the `readynasctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use readynas_api::FanMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// readynasctl -- monitor and manage ReadyNAS devices from the command line
#[derive(Debug, Parser)]
#[command(
    name = "readynasctl",
    version,
    about = "Monitor and manage NETGEAR ReadyNAS devices over the local admin protocol",
    long_about = "Polls a ReadyNAS device's dbbroker endpoint for health, volume, and\n\
        system information, and drives fan-profile and shutdown commands.\n\
        Credentials come from a profile, flags, or READYNAS_PASSWORD.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "READYNAS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device hostname or IP (overrides profile)
    #[arg(long, short = 'H', env = "READYNAS_HOST", global = true)]
    pub host: Option<String>,

    /// Admin account name (overrides profile)
    #[arg(long, short = 'u', env = "READYNAS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Force HTTPS to the device
    #[arg(long, global = true, conflicts_with = "no_ssl")]
    pub ssl: bool,

    /// Force plain HTTP to the device
    #[arg(long, global = true)]
    pub no_ssl: bool,

    /// Verify the device's TLS certificate (off by default; the
    /// factory certificate is self-signed)
    #[arg(long, global = true)]
    pub verify_certs: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "READYNAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "READYNAS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the device health report (CPU temp, fan, disks, volumes)
    #[command(alias = "h")]
    Health,

    /// List data volumes with capacity and RAID layout
    #[command(alias = "vol", alias = "v")]
    Volumes,

    /// System-level info and power control
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Read or change the chassis fan profile
    Fan(FanArgs),

    /// Poll the device on a fixed cadence and print each report
    Watch(WatchArgs),

    /// Manage device profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Show model, firmware, serial number, uptime, and MAC address
    Info,

    /// Shut the device down (destructive; requires --yes)
    Shutdown,
}

// ── Fan ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FanArgs {
    #[command(subcommand)]
    pub command: FanCommand,
}

#[derive(Debug, Subcommand)]
pub enum FanCommand {
    /// Show the active fan profile
    Get,

    /// Change the fan profile
    Set {
        /// Target profile
        #[arg(value_enum)]
        mode: FanModeArg,
    },
}

/// CLI-facing fan modes. `unknown` is read-only and deliberately not
/// accepted here, so invalid modes die at argument parsing.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FanModeArg {
    Cool,
    Balanced,
    Quiet,
}

impl From<FanModeArg> for FanMode {
    fn from(arg: FanModeArg) -> Self {
        match arg {
            FanModeArg::Cool => Self::Cool,
            FanModeArg::Balanced => Self::Balanced,
            FanModeArg::Quiet => Self::Quiet,
        }
    }
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls
    #[arg(long, short = 'i', default_value = "30")]
    pub interval: u64,

    /// Stop after this many polls (default: run until interrupted)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a device profile
    Init {
        /// Device hostname or IP
        #[arg(long)]
        host: String,

        /// Admin account name
        #[arg(long, default_value = "admin")]
        username: String,

        /// Store the password in the config file (plaintext; prefer
        /// the READYNAS_PASSWORD env var)
        #[arg(long)]
        password: Option<String>,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Use plain HTTP for this profile
        #[arg(long)]
        no_ssl: bool,
    },

    /// Print the active configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
