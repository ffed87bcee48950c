//! # lemon-core
//!
//! Foundational types shared by every LemonLens crate:
//! - Identity types (anonymous session, authenticated user) and request scoping
//! - The `Report` entity, its status state machine, and creation input validation
//! - Boundary normalization of the loosely shaped report payloads the API returns
//! - The four-way report view mapping used by presentation code
//! - A `Clock` seam so expiry logic is testable without real time

pub mod clock;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod input;
pub mod normalize;
pub mod report;
pub mod result;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use enums::ReportStatus;
pub use errors::CoreError;
pub use identity::{AnonymousSession, AuthenticatedUser, Identity, Scope};
pub use input::ReportInput;
pub use report::{Report, ReportOwner};
pub use result::ReportResult;
pub use view::{Lookup, Outcome, ReportView};
