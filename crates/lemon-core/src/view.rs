//! Report view state.
//!
//! Presentation code renders exactly one of four states. The mapping is pure;
//! transitions are driven entirely by what the report poller observes.
//!
//! A terminal failure renders through [`ReportView::Complete`] with
//! [`Outcome::Failed`], so "terminal" and "complete view" coincide.

use serde::Serialize;

use crate::enums::ReportStatus;
use crate::report::Report;
use crate::result::ReportResult;

/// What a detail fetch has produced so far.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// No response yet.
    Pending,
    /// The fetch succeeded; `None` means the server had nothing.
    Fetched(Option<&'a Report>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportView<'a> {
    Loading,
    NotFound,
    InProgress {
        report: &'a Report,
        /// Coarse indeterminate progress, 30 while queued and 60 while processing.
        progress_hint: u8,
    },
    Complete {
        report: &'a Report,
        outcome: Outcome<'a>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<'a> {
    /// `result` may still be absent if the generator returned nothing.
    Succeeded { result: Option<&'a ReportResult> },
    Failed,
}

impl<'a> ReportView<'a> {
    #[must_use]
    pub fn from_lookup(lookup: Lookup<'a>) -> Self {
        match lookup {
            Lookup::Pending => Self::Loading,
            Lookup::Fetched(None) => Self::NotFound,
            Lookup::Fetched(Some(report)) => Self::for_report(report),
        }
    }

    #[must_use]
    pub fn for_report(report: &'a Report) -> Self {
        match report.status {
            ReportStatus::Pending => Self::InProgress {
                report,
                progress_hint: 30,
            },
            ReportStatus::Processing => Self::InProgress {
                report,
                progress_hint: 60,
            },
            ReportStatus::Completed => Self::Complete {
                report,
                outcome: Outcome::Succeeded {
                    result: report.result.as_ref(),
                },
            },
            ReportStatus::Failed => Self::Complete {
                report,
                outcome: Outcome::Failed,
            },
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::NotFound => "not_found",
            Self::InProgress { .. } => "in_progress",
            Self::Complete { .. } => "complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(status: ReportStatus) -> Report {
        crate::normalize::report_from_value(&json!({
            "uuid": "r1", "make": "Honda", "model": "Civic", "year": 2018,
            "mileage": 60000, "status": status.as_str(),
            "result": {"score": 82}
        }))
        .expect("normalize")
    }

    #[test]
    fn lookup_states() {
        assert_eq!(ReportView::from_lookup(Lookup::Pending), ReportView::Loading);
        assert_eq!(ReportView::from_lookup(Lookup::Fetched(None)), ReportView::NotFound);
    }

    #[test]
    fn non_terminal_statuses_are_in_progress() {
        let pending = report(ReportStatus::Pending);
        let processing = report(ReportStatus::Processing);
        assert!(matches!(
            ReportView::for_report(&pending),
            ReportView::InProgress { progress_hint: 30, .. }
        ));
        assert!(matches!(
            ReportView::for_report(&processing),
            ReportView::InProgress { progress_hint: 60, .. }
        ));
    }

    #[test]
    fn terminal_statuses_are_complete() {
        let done = report(ReportStatus::Completed);
        let failed = report(ReportStatus::Failed);
        match ReportView::for_report(&done) {
            ReportView::Complete {
                outcome: Outcome::Succeeded { result: Some(result) },
                ..
            } => assert_eq!(result.score(), Some(82.0)),
            other => panic!("unexpected view {other:?}"),
        }
        assert!(matches!(
            ReportView::for_report(&failed),
            ReportView::Complete { outcome: Outcome::Failed, .. }
        ));
    }

    #[test]
    fn view_names() {
        let done = report(ReportStatus::Completed);
        assert_eq!(ReportView::for_report(&done).name(), "complete");
        assert_eq!(ReportView::NotFound.name(), "not_found");
    }
}
