//! Fan profile command handlers.

use readynas_api::{FanMode, ReadyNasClient};

use crate::cli::{FanArgs, FanCommand, GlobalOpts};
use crate::error::{CliError, from_api_error};
use crate::output;

pub async fn handle(
    client: &ReadyNasClient,
    args: FanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FanCommand::Get => {
            let mode = client
                .get_fan_mode()
                .await
                .map_err(|e| from_api_error(e, client.host()))?;

            let rendered = output::render_single(
                &global.output,
                &mode,
                |m| format!("Fan mode: {m}"),
                ToString::to_string,
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        FanCommand::Set { mode } => {
            let mode: FanMode = mode.into();
            client
                .set_fan_mode(mode)
                .await
                .map_err(|e| from_api_error(e, client.host()))?;

            output::print_output(&format!("Fan mode set to {mode}"), global.quiet);
            Ok(())
        }
    }
}
