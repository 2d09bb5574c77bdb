//! Profile management: init, show, path.

use readynas_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &readynas_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = readynas_config::load_config_or_default();
            output::print_output(&render_redacted(&cfg)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            host,
            username,
            password,
            name,
            no_ssl,
        } => {
            let mut cfg = readynas_config::load_config_or_default();

            cfg.profiles.insert(
                name.clone(),
                Profile {
                    host,
                    username,
                    password,
                    use_ssl: !no_ssl,
                    ignore_ssl_errors: true,
                    timeout: None,
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }

            readynas_config::save_config(&cfg)?;
            output::print_output(
                &format!(
                    "Profile '{name}' saved to {}",
                    readynas_config::config_path().display()
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}

/// TOML dump of the config with stored passwords masked.
fn render_redacted(cfg: &Config) -> Result<String, CliError> {
    let mut shown = cfg.clone();
    for profile in shown.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }
    toml::to_string_pretty(&shown).map_err(|e| CliError::Config(e.into()))
}
