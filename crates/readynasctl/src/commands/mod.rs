//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod fan;
pub mod health;
pub mod system;
pub mod util;
pub mod volumes;
pub mod watch;

use readynas_api::ReadyNasClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ReadyNasClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Health => health::handle(client, global).await,
        Command::Volumes => volumes::handle(client, global).await,
        Command::System(args) => system::handle(client, args, global).await,
        Command::Fan(args) => fan::handle(client, args, global).await,
        Command::Watch(args) => watch::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
