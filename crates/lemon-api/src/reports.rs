//! Report endpoints. Responses are normalized through `lemon_core::normalize`
//! since the server has shipped several report shapes.

use lemon_core::{
    Report, ReportInput, Scope,
    normalize::{report_from_value, reports_from_value},
};
use reqwest::Method;
use serde_json::Value;

use crate::{
    ApiClient, ApiError, ReportApi,
    http::check_response,
    wire::{CreateReportBody, ScopedBody},
};

impl ReportApi for ApiClient {
    async fn list_reports(&self, scope: &Scope) -> Result<Vec<Report>, ApiError> {
        let url = self.scoped_url("reports", scope);
        let resp = check_response(self.scoped(Method::GET, &url, scope).send().await?).await?;
        let body: Value = resp.json().await?;
        let reports = reports_from_value(&body)?;
        tracing::debug!(scope = %scope.cache_key(), count = reports.len(), "listed reports");
        Ok(reports)
    }

    async fn get_report(&self, scope: &Scope, id: &str) -> Result<Report, ApiError> {
        let url = self.scoped_url(&report_path(id), scope);
        let resp = check_response(self.scoped(Method::GET, &url, scope).send().await?).await?;
        let body: Value = resp.json().await?;
        Ok(report_from_value(&body)?)
    }

    async fn create_report(&self, scope: &Scope, input: &ReportInput) -> Result<Report, ApiError> {
        let url = self.url("reports");
        let body = CreateReportBody::new(input, scope.session_id());
        let resp =
            check_response(self.scoped(Method::POST, &url, scope).json(&body).send().await?).await?;
        let body: Value = resp.json().await?;
        Ok(report_from_value(&body)?)
    }

    async fn retry_report(&self, scope: &Scope, id: &str) -> Result<Option<Report>, ApiError> {
        let url = self.url(&format!("{}/retry", report_path(id)));
        let body = ScopedBody {
            session_id: scope.session_id(),
        };
        let resp =
            check_response(self.scoped(Method::POST, &url, scope).json(&body).send().await?).await?;
        let text = resp.text().await?;
        Ok(retried_report(&text))
    }
}

fn report_path(id: &str) -> String {
    format!("reports/{}", urlencoding::encode(id))
}

/// Retry responses range from an empty body to a full report.
fn retried_report(text: &str) -> Option<Report> {
    let value = serde_json::from_str::<Value>(text).ok()?;
    report_from_value(&value).ok()
}
