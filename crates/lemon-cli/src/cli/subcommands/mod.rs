pub mod auth;
pub mod report;
pub mod session;
pub mod vehicle;

pub use auth::AuthCommands;
pub use report::ReportCommands;
pub use session::SessionCommands;
pub use vehicle::VehicleCommands;
