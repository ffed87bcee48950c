use std::future::Future;

use lemon_core::{Report, ReportInput, Scope};

use crate::ApiError;
use crate::wire::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, UserProfile};

/// Anonymous session issuance.
pub trait SessionApi: Send + Sync {
    /// Ask the server for a fresh anonymous session id.
    fn issue_session(&self) -> impl Future<Output = Result<String, ApiError>> + Send;
}

/// Credential exchange and account lookups.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn login_google(
        &self,
        request: &GoogleLoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// Invalidate the server-side session for `token`.
    fn logout(&self, token: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Current account, including its credit balance.
    fn me(&self, token: &str) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;
}

/// Identity-scoped report endpoints.
pub trait ReportApi: Send + Sync {
    fn list_reports(
        &self,
        scope: &Scope,
    ) -> impl Future<Output = Result<Vec<Report>, ApiError>> + Send;

    fn get_report(
        &self,
        scope: &Scope,
        id: &str,
    ) -> impl Future<Output = Result<Report, ApiError>> + Send;

    /// Submit a validated input. Validation is the caller's job.
    fn create_report(
        &self,
        scope: &Scope,
        input: &ReportInput,
    ) -> impl Future<Output = Result<Report, ApiError>> + Send;

    /// Ask the server to re-run a failed report. Returns the updated report
    /// when the response carries one.
    fn retry_report(
        &self,
        scope: &Scope,
        id: &str,
    ) -> impl Future<Output = Result<Option<Report>, ApiError>> + Send;
}
