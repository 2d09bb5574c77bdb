//! System command handlers: info and shutdown.

use readynas_api::{ReadyNasClient, SystemInfo};

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::{CliError, from_api_error};
use crate::output;

fn detail(info: &SystemInfo) -> String {
    [
        format!("Model:    {}", info.model),
        format!("Firmware: {} {}", info.firmware_name, info.firmware_version),
        format!("Serial:   {}", info.serial_number),
        format!("Uptime:   {}", info.uptime),
        format!("MAC:      {}", info.mac_address),
    ]
    .join("\n")
}

pub async fn handle(
    client: &ReadyNasClient,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Info => {
            let info = client
                .get_system_info()
                .await
                .map_err(|e| from_api_error(e, client.host()))?;

            let rendered =
                output::render_single(&global.output, &info, detail, |i| i.model.clone());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        SystemCommand::Shutdown => {
            // Confirm before any network traffic -- the device executes
            // the halt immediately, there is no undo.
            if !global.yes {
                return Err(CliError::ConfirmationRequired { action: "shutdown" });
            }

            client
                .shutdown()
                .await
                .map_err(|e| from_api_error(e, client.host()))?;

            output::print_output(
                &format!("Shutdown command sent to {}", client.host()),
                global.quiet,
            );
            Ok(())
        }
    }
}
