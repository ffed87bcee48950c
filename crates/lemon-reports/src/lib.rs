//! # lemon-reports
//!
//! Report resources for the active LemonLens identity: listing, creation,
//! retry, and status polling.
//!
//! - [`ReportService`] scopes every call by the identity an
//!   [`lemon_auth::AuthManager`] publishes, validates input before any
//!   request, and invalidates the list cache only after a confirmed write.
//! - [`ListCache`] collapses concurrent list reads per scope.
//! - [`Poller`] is the `idle-slow | active-fast | stopped` scheduler for a
//!   single report; [`watch_list`] keeps a list view fresh.

pub mod cache;
pub mod error;
pub mod list_watch;
pub mod poller;
pub mod service;

pub use cache::ListCache;
pub use error::ReportError;
pub use list_watch::watch_list;
pub use poller::{PollEvent, PollSchedule, Poller, StopHandle, StopSignal, Tier, stop_pair};
pub use service::ReportService;
