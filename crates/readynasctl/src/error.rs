//! CLI error types with miette diagnostics.
//!
//! Maps `readynas_api::Error` and `ConfigError` variants into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use readynas_config::ConfigError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NO_DATA: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the device at {host}")]
    #[diagnostic(
        code(readynas::connection_failed),
        help(
            "Check that the device is powered on and reachable.\n\
             Host: {host}\n\
             Try: readynasctl --host {host} --no-ssl system info"
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(readynas::auth_failed),
        help(
            "Verify the admin username and password.\n\
             Set READYNAS_PASSWORD or update the profile with: readynasctl config init"
        )
    )]
    AuthFailed,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(readynas::no_credentials),
        help(
            "Set the READYNAS_PASSWORD environment variable, or store a\n\
             password with: readynasctl config init"
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("No data from the device: {operation}")]
    #[diagnostic(
        code(readynas::no_data),
        help(
            "The device answered but produced no usable data. readynasd may\n\
             be restarting -- the next poll usually succeeds."
        )
    )]
    NoData { operation: String },

    #[error("Device rejected the command (HTTP {status})")]
    #[diagnostic(code(readynas::rejected))]
    Rejected { status: u16 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(readynas::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(readynas::profile_not_found),
        help("Create one with: readynasctl config init --host <host> --name {name}")
    )]
    ProfileNotFound { name: String },

    #[error("No device configured")]
    #[diagnostic(
        code(readynas::no_config),
        help(
            "Pass --host, or create a profile with: readynasctl config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(readynas::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(readynas::confirmation_required),
        help("Re-run with --yes (-y) to confirm.")
    )]
    ConfirmationRequired { action: &'static str },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoData { .. } => exit_code::NO_DATA,
            Self::Validation { .. } | Self::ConfirmationRequired { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── readynas_api::Error → CliError mapping ──────────────────────────

/// Convert an API error for a device addressed as `host`.
pub fn from_api_error(err: readynas_api::Error, host: &str) -> CliError {
    use readynas_api::Error as Api;

    match err {
        Api::Authentication { .. } | Api::SessionExpired => CliError::AuthFailed,

        Api::Transport(e) => CliError::ConnectionFailed {
            host: host.to_owned(),
            source: e.into(),
        },

        Api::RetryExhausted {
            operation, source, ..
        } => {
            // Credentials problems beat "try again later" in the message.
            if matches!(source.as_deref(), Some(Api::Authentication { .. })) {
                CliError::AuthFailed
            } else {
                CliError::NoData {
                    operation: operation.to_owned(),
                }
            }
        }

        Api::Rejected { status } => CliError::Rejected { status },

        Api::InvalidFanMode { value } => CliError::Validation {
            field: "mode".into(),
            reason: format!("'{value}' is not an accepted fan mode"),
        },

        other => CliError::ConnectionFailed {
            host: host.to_owned(),
            source: other.into(),
        },
    }
}
