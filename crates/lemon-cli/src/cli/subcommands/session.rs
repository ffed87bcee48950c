use clap::Subcommand;

/// Anonymous session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Show the active identity without touching the network.
    Show,
    /// Discard the anonymous session and obtain a new one.
    Reset,
}
