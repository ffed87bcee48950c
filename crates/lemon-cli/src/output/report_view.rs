//! Human rendering of reports and report view states.

use std::fmt::Write as _;

use lemon_core::{Outcome, Report, ReportOwner, ReportResult, ReportView};
use serde::Serialize;

const COMPLAINTS_SHOWN: usize = 5;

/// One line of `report list`.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub vehicle: String,
    pub mileage: u32,
    pub status: String,
    pub premium: bool,
    pub owner: String,
    pub created: String,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            id: report.key().unwrap_or_else(|| "-".into()),
            vehicle: report.vehicle(),
            mileage: report.mileage,
            status: report.status.to_string(),
            premium: report.is_premium,
            owner: match &report.owner {
                Some(ReportOwner::User(id)) => format!("user:{id}"),
                Some(ReportOwner::Session(_)) => "session".into(),
                None => "-".into(),
            },
            created: report
                .created_at
                .map_or_else(|| "-".into(), |at| at.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

/// Multi-line description of a view state.
#[must_use]
pub fn render_text(view: &ReportView<'_>) -> String {
    match view {
        ReportView::Loading => "Loading report…".into(),
        ReportView::NotFound => "Report not found.".into(),
        ReportView::InProgress {
            report,
            progress_hint,
        } => {
            let mut out = heading(report);
            let _ = writeln!(out, "Status:   {} ({progress_hint}%)", report.status);
            out.push_str("The report is being generated; use `lemonlens report watch` to follow it.");
            out
        }
        ReportView::Complete {
            report,
            outcome: Outcome::Failed,
        } => {
            let mut out = heading(report);
            let _ = writeln!(out, "Status:   failed");
            let id = report.key().unwrap_or_default();
            let _ = write!(out, "Generation failed. Retry with `lemonlens report retry {id}`.");
            out
        }
        ReportView::Complete {
            report,
            outcome: Outcome::Succeeded { result },
        } => {
            let mut out = heading(report);
            let _ = writeln!(out, "Status:   completed");
            match result.filter(|r| !r.is_empty()) {
                Some(result) => out.push_str(&render_result(result)),
                None => out.push_str("No findings were returned for this vehicle."),
            }
            out
        }
    }
}

/// Short progress line used while watching.
#[must_use]
pub fn status_line(report: &Report) -> String {
    format!("{}: {}", report.vehicle(), report.status)
}

fn heading(report: &Report) -> String {
    let mut out = format!("{}\n", report.vehicle());
    let _ = writeln!(out, "Report:   {}", report.key().unwrap_or_else(|| "-".into()));
    let _ = writeln!(out, "Mileage:  {}", group_thousands(report.mileage));
    if let Some(vin) = report.vin.as_deref() {
        let _ = writeln!(out, "VIN:      {vin}");
    }
    if report.is_premium {
        let _ = writeln!(out, "Premium:  yes");
    }
    out
}

fn render_result(result: &ReportResult) -> String {
    let mut out = String::new();
    if let Some(score) = result.score() {
        let _ = writeln!(out, "Score:    {score:.0}/100");
    }
    if let Some(recommendation) = result.recommendation() {
        let _ = writeln!(out, "Verdict:  {recommendation}");
    }
    match (result.cost_from(), result.cost_to()) {
        (Some(from), Some(to)) => {
            let _ = writeln!(out, "Repairs:  ${from:.0} - ${to:.0}");
        }
        (Some(cost), None) | (None, Some(cost)) => {
            let _ = writeln!(out, "Repairs:  ~${cost:.0}");
        }
        (None, None) => {}
    }
    if let Some(summary) = result.summary() {
        let _ = writeln!(out, "\n{summary}");
    }
    section(&mut out, "Known issues", &result.known_issues());
    section(&mut out, "Recalls", &result.recalls());

    let complaints = result.complaints();
    if !complaints.is_empty() {
        let _ = writeln!(out, "\nTop complaints:");
        for complaint in complaints.iter().take(COMPLAINTS_SHOWN) {
            let _ = writeln!(out, "  {:<24} {}", complaint.component, complaint.count);
        }
    }
    section(&mut out, "Suggestions", &result.suggestions());
    out.trim_end().to_string()
}

fn section(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use lemon_core::normalize::report_from_value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn report(status: &str, result: serde_json::Value) -> Report {
        report_from_value(&json!({
            "uuid": "r-1", "make": "Honda", "model": "Civic", "year": 2018,
            "mileage": 60000, "status": status, "result": result,
        }))
        .unwrap()
    }

    #[test]
    fn mileage_groups_thousands() {
        assert_eq!(group_thousands(60_000), "60,000");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn completed_report_lists_findings() {
        let report = report(
            "completed",
            json!({
                "score": 82,
                "recommendation": "Buy",
                "cost_from": 300, "cost_to": 900,
                "known_issues": [{"title": "CVT judder"}],
                "complaints": {"engine": 12, "brakes": 40},
            }),
        );
        let text = render_text(&ReportView::for_report(&report));
        assert!(text.starts_with("2018 Honda Civic\n"));
        assert!(text.contains("Mileage:  60,000"));
        assert!(text.contains("Score:    82/100"));
        assert!(text.contains("Repairs:  $300 - $900"));
        assert!(text.contains("  - CVT judder"));
        let brakes = text.find("brakes").unwrap();
        let engine = text.find("engine").unwrap();
        assert!(brakes < engine);
    }

    #[test]
    fn failed_report_points_at_retry() {
        let report = report("failed", json!(null));
        let text = render_text(&ReportView::for_report(&report));
        assert!(text.contains("lemonlens report retry r-1"));
    }

    #[test]
    fn list_row_hides_session_ids() {
        let mut report = report("pending", json!(null));
        report.owner = Some(ReportOwner::Session("abc".into()));
        let row = ReportRow::from(&report);
        assert_eq!(row.owner, "session");
        assert_eq!(row.status, "pending");
        assert_eq!(row.created, "-");
    }
}
