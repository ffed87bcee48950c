use crate::cli::GlobalFlags;
use crate::cli::subcommands::VehicleCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lemonlens vehicle <subcommand>`.
pub async fn handle(
    action: &VehicleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let names = match action {
        VehicleCommands::Makes => ctx.api.vehicle_makes().await?,
        VehicleCommands::Models { make } => ctx.api.vehicle_models(make).await?,
        VehicleCommands::Years { model } => ctx.api.vehicle_years(model).await?,
    };
    output(&names, flags.format)
}
