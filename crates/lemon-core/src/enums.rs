//! Report lifecycle status.
//!
//! Serialized as `snake_case`. The status machine is enforced on the client
//! only where the client itself causes a transition (retry); every other
//! transition is observed from the server through polling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a report.
///
/// ```text
/// pending → processing → completed
///                      → failed → processing (retry)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReportStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Completed, Self::Failed],
            Self::Processing => &[Self::Completed, Self::Failed],
            Self::Failed => &[Self::Processing],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `completed` and `failed` end polling.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse the wire spelling. Accepts the aliases the API has used over time.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" | "created" => Some(Self::Pending),
            "processing" | "in_progress" | "running" => Some(Self::Processing),
            "completed" | "complete" | "done" | "succeeded" => Some(Self::Completed),
            "failed" | "error" | "errored" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_forward_edges_except_retry() {
        assert!(ReportStatus::Completed.allowed_next_states().is_empty());
        assert_eq!(
            ReportStatus::Failed.allowed_next_states(),
            &[ReportStatus::Processing]
        );
    }

    #[test]
    fn terminal_flags() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Processing.is_terminal());
        assert!(ReportStatus::Completed.is_terminal());
        assert!(ReportStatus::Failed.is_terminal());
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(ReportStatus::parse("Complete"), Some(ReportStatus::Completed));
        assert_eq!(ReportStatus::parse(" in_progress "), Some(ReportStatus::Processing));
        assert_eq!(ReportStatus::parse("errored"), Some(ReportStatus::Failed));
        assert_eq!(ReportStatus::parse("bogus"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ReportStatus::Processing).expect("serialize");
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn retry_edge_only_from_failed() {
        assert!(ReportStatus::Failed.can_transition_to(ReportStatus::Processing));
        assert!(!ReportStatus::Completed.can_transition_to(ReportStatus::Processing));
    }
}
