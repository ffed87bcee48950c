use anyhow::Context;
use clap::Parser;
use lemon_config::LemonConfig;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lemonlens error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config =
        LemonConfig::load_with_dotenv().context("failed to load lemonlens configuration")?;
    let ctx = context::AppContext::init(config)?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

/// Logs go to stderr so `--format json` output stays machine-readable.
/// `LEMONLENS_LOG` (an `EnvFilter` directive) beats `--quiet`/`--verbose`.
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "lemon_cli=debug,lemon_reports=debug,lemon_auth=debug,lemon_api=debug,info",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_env("LEMONLENS_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))
}
