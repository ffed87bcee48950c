use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Session { action } => commands::session::handle(&action, ctx, flags).await,
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::Vehicle { action } => commands::vehicle::handle(&action, ctx, flags).await,
        Commands::Credits(args) => commands::credits::handle(&args, ctx, flags).await,
        Commands::Checkout(args) => commands::checkout::handle(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
