//! Bridges profiles and CLI flags into a `readynas_api::ClientConfig`.

use std::time::Duration;

use secrecy::SecretString;

use readynas_api::ClientConfig;
use readynas_config::{Config, PASSWORD_ENV, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The profile name selected by flags, env, or the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI
/// overrides. Flags win over profile fields, profiles over defaults.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = readynas_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let profile = apply_overrides(profile.clone(), global);
        return readynas_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)
            .map_err(map_config_error);
    }

    // The user asked for a specific profile that doesn't exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound { name: profile_name });
    }

    // No profile -- build from flags / env vars alone.
    let Some(host) = global.host.clone() else {
        return Err(CliError::NoConfig {
            path: readynas_config::config_path().display().to_string(),
        });
    };

    let password = std::env::var(PASSWORD_ENV)
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut config = ClientConfig::new(
        host,
        global.username.clone().unwrap_or_else(|| "admin".into()),
        password,
    );
    // Flag-only invocations default to HTTPS like fresh profiles do.
    config.use_ssl = !global.no_ssl;
    config.ignore_ssl_errors = !global.verify_certs;
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    Ok(config)
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref host) = global.host {
        profile.host = host.clone();
    }
    if let Some(ref username) = global.username {
        profile.username = username.clone();
    }
    if global.ssl {
        profile.use_ssl = true;
    }
    if global.no_ssl {
        profile.use_ssl = false;
    }
    if global.verify_certs {
        profile.ignore_ssl_errors = false;
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

fn map_config_error(err: readynas_config::ConfigError) -> CliError {
    match err {
        readynas_config::ConfigError::NoCredentials { profile } => {
            CliError::NoCredentials { profile }
        }
        other => CliError::Config(other),
    }
}
