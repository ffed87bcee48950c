pub mod auth;
pub mod checkout;
pub mod credits;
pub mod dispatch;
pub mod report;
pub mod schema;
pub mod session;
pub mod vehicle;
