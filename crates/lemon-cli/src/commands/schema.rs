use lemon_auth::StoredState;
use lemon_core::{AuthenticatedUser, Report, ReportInput};
use schemars::schema_for;

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `lemonlens schema <type>`. Tables make no sense for a schema, so
/// anything but `raw` prints pretty JSON.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::Report => schema_for!(Report),
        SchemaType::User => schema_for!(AuthenticatedUser),
        SchemaType::Session => schema_for!(StoredState),
        SchemaType::Input => schema_for!(ReportInput),
    };
    let format = if flags.format == OutputFormat::Raw {
        OutputFormat::Raw
    } else {
        OutputFormat::Json
    };
    output(&schema, format)
}
