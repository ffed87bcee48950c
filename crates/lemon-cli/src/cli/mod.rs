use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `lemonlens` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lemonlens",
    version,
    about = "LemonLens - used-car health reports from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Colorize table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (errors only, no spinners)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            color: self.color,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::root_commands::{SchemaArgs, SchemaType};
    use super::subcommands::{AuthCommands, ReportCommands, VehicleCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_on_either_side() {
        let cli = Cli::try_parse_from(["lemonlens", "--format", "json", "credits", "--verbose"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Credits(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["lemonlens", "--format", "xml", "credits"]).is_err());
    }

    #[test]
    fn report_create_parses_vehicle_fields() {
        let cli = Cli::try_parse_from([
            "lemonlens", "report", "create", "--make", "Honda", "--model", "Civic", "--year",
            "2018", "--mileage", "60000", "--zip", "94107", "--watch",
        ])
        .expect("cli should parse");

        let Commands::Report {
            action: ReportCommands::Create(args),
        } = cli.command
        else {
            panic!("expected report create");
        };
        let input = args.to_input();
        assert_eq!(input.make, "Honda");
        assert_eq!(input.mileage, 60_000);
        assert_eq!(input.zip_code.as_deref(), Some("94107"));
        assert!(input.is_premium());
        assert!(args.watch);
    }

    #[test]
    fn negative_mileage_reaches_validation() {
        let cli = Cli::try_parse_from([
            "lemonlens", "report", "create", "--make", "Honda", "--model", "Civic", "--year",
            "2018", "--mileage", "-5",
        ])
        .expect("negative mileage should parse and be rejected later");
        assert!(matches!(cli.command, Commands::Report { .. }));
    }

    #[test]
    fn login_requires_email() {
        assert!(Cli::try_parse_from(["lemonlens", "auth", "login"]).is_err());
        let cli = Cli::try_parse_from([
            "lemonlens", "auth", "login", "--email", "dana@example.com", "--password-stdin",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Login(_)
            }
        ));
    }

    #[test]
    fn vehicle_models_takes_make() {
        let cli = Cli::try_parse_from(["lemonlens", "vehicle", "models", "Honda"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Vehicle {
                action: VehicleCommands::Models { ref make }
            } if make == "Honda"
        ));
    }

    #[test]
    fn schema_takes_a_known_type() {
        let cli = Cli::try_parse_from(["lemonlens", "schema", "input"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Schema(SchemaArgs {
                type_name: SchemaType::Input
            })
        ));
        assert!(Cli::try_parse_from(["lemonlens", "schema", "invoice"]).is_err());
    }
}
