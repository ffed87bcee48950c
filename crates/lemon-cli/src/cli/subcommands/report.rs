use clap::{Args, Subcommand};
use lemon_core::ReportInput;

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Request a new vehicle report.
    Create(ReportCreateArgs),
    /// List reports visible to the active identity.
    List(ReportListArgs),
    /// Show one report.
    Get(ReportIdArgs),
    /// Re-submit a failed report.
    Retry(ReportIdArgs),
    /// Follow one report until it finishes.
    Watch(ReportRefArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ReportCreateArgs {
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long, allow_negative_numbers = true)]
    pub mileage: i64,
    #[arg(long)]
    pub vin: Option<String>,
    /// ZIP code for regional pricing (premium).
    #[arg(long)]
    pub zip: Option<String>,
    /// Link to the listing (premium).
    #[arg(long)]
    pub listing: Option<String>,
    /// Free-text context for the report (premium).
    #[arg(long)]
    pub info: Option<String>,
    /// Follow the report until it finishes.
    #[arg(long)]
    pub watch: bool,
}

impl ReportCreateArgs {
    #[must_use]
    pub fn to_input(&self) -> ReportInput {
        ReportInput {
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            mileage: self.mileage,
            vin: self.vin.clone(),
            zip_code: self.zip.clone(),
            listing_link: self.listing.clone(),
            additional_info: self.info.clone(),
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ReportListArgs {
    /// Keep the list fresh until interrupted.
    #[arg(long)]
    pub watch: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ReportIdArgs {
    /// Report id or uuid.
    pub id: String,
    /// Follow the report until it finishes.
    #[arg(long)]
    pub watch: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ReportRefArgs {
    /// Report id or uuid.
    pub id: String,
}
