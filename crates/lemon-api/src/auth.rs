//! Authentication endpoints.

use reqwest::Method;
use serde_json::Value;

use crate::{
    ApiClient, ApiError, AuthApi,
    http::check_response,
    wire::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, UserProfile},
};

impl ApiClient {
    async fn exchange<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.url(path);
        let resp = check_response(self.request(Method::POST, &url).json(body).send().await?).await?;
        let response: AuthResponse = resp.json().await?;
        if let Some(migrated) = response.migrated_reports {
            tracing::debug!(migrated, "server migrated anonymous reports");
        }
        Ok(response)
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.exchange("auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.exchange("auth/register", request).await
    }

    async fn login_google(&self, request: &GoogleLoginRequest) -> Result<AuthResponse, ApiError> {
        self.exchange("auth/google", request).await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let url = self.url("auth/logout");
        check_response(self.bearer(Method::POST, &url, token).send().await?).await?;
        Ok(())
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = self.url("me");
        let resp = check_response(self.bearer(Method::GET, &url, token).send().await?).await?;
        let body: Value = resp.json().await?;
        profile_from_value(body)
    }
}

/// `/me` answers either with the user object or with `{ "user": {...} }`.
fn profile_from_value(mut body: Value) -> Result<UserProfile, ApiError> {
    if let Some(user) = body.get_mut("user").map(Value::take) {
        body = user;
    }
    serde_json::from_value(body).map_err(|e| ApiError::Parse(format!("user profile: {e}")))
}
