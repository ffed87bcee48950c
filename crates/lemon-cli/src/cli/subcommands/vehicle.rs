use clap::Subcommand;

/// Vehicle catalogue commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VehicleCommands {
    /// List known makes.
    Makes,
    /// List models for a make.
    Models { make: String },
    /// List model years for a model.
    Years { model: String },
}
