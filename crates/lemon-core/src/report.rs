use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReportStatus;
use crate::errors::CoreError;
use crate::result::ReportResult;

/// Who a report was created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ReportOwner {
    User(String),
    Session(String),
}

/// A vehicle health report in canonical form.
///
/// Built only by [`crate::normalize`]; nothing downstream inspects raw API
/// payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// Local ordinal, when the server exposes one.
    pub id: Option<i64>,
    /// Server-assigned identifier, authoritative when present.
    pub uuid: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: u32,
    pub vin: Option<String>,
    pub zip_code: Option<String>,
    pub listing_link: Option<String>,
    pub additional_info: Option<String>,
    pub is_premium: bool,
    pub owner: Option<ReportOwner>,
    pub status: ReportStatus,
    pub result: Option<ReportResult>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Identifier to address the report by: `uuid` first, else `id`.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.uuid
            .clone()
            .or_else(|| self.id.map(|id| id.to_string()))
    }

    /// One-line vehicle description, e.g. `2018 Honda Civic`.
    #[must_use]
    pub fn vehicle(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// Apply a locally caused transition, enforcing the status machine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if `next` is not reachable.
    pub fn transition(&mut self, next: ReportStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                id: self.key().unwrap_or_default(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next == ReportStatus::Processing {
            self.completed_at = None;
            self.result = None;
        }
        Ok(())
    }
}
