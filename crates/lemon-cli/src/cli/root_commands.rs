use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{AuthCommands, ReportCommands, SessionCommands, VehicleCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Anonymous session management.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Account login, registration and logout.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Vehicle health reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Vehicle catalogue lookups.
    Vehicle {
        #[command(subcommand)]
        action: VehicleCommands,
    },
    /// Show the account's credit balance.
    Credits(CreditsArgs),
    /// Buy credits through the hosted checkout page.
    Checkout(CheckoutArgs),
    /// Print the JSON Schema of a data type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CreditsArgs {
    /// Keep refreshing the balance until interrupted.
    #[arg(long)]
    pub watch: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CheckoutArgs {
    /// Price identifier of the credit pack.
    pub price_id: String,
    /// Print the checkout URL without opening a browser.
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Report,
    User,
    Session,
    Input,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
