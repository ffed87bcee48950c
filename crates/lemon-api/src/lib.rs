//! # lemon-api
//!
//! HTTP client for the LemonLens vehicle report API.
//!
//! One [`ApiClient`] covers every endpoint:
//! - anonymous session issuance (`GET /session`)
//! - auth (`/auth/login`, `/auth/register`, `/auth/google`, `/auth/logout`, `/me`)
//! - reports (`/reports`, `/reports/{id}`, `/reports/{id}/retry`)
//! - vehicle catalogue (`/vehicles/*`) and checkout (`/stripe/checkout`)
//!
//! Higher crates depend on the [`SessionApi`], [`AuthApi`] and [`ReportApi`]
//! traits rather than the concrete client so they can be exercised against
//! in-memory fakes.

pub mod auth;
pub mod checkout;
pub mod reports;
pub mod session;
pub mod vehicles;
pub mod wire;

mod error;
pub mod http;
mod traits;

pub use error::ApiError;
pub use traits::{AuthApi, ReportApi, SessionApi};
pub use wire::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, UserProfile};

use std::time::Duration;

use lemon_config::ApiConfig;
use lemon_core::Scope;
use reqwest::{Method, RequestBuilder, header};

const USER_AGENT: &str = concat!("lemonlens/", env!("CARGO_PKG_VERSION"));

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for an unusable base URL and
    /// [`ApiError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.normalized_base_url()?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.has_api_key().then(|| config.api_key.clone()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL for `path`, carrying `session_id` as a query parameter for session scope.
    fn scoped_url(&self, path: &str, scope: &Scope) -> String {
        let url = self.url(path);
        match scope.session_id() {
            Some(session_id) => format!("{url}?session_id={}", urlencoding::encode(session_id)),
            None => url,
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder
    }

    fn bearer(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        self.request(method, url).bearer_auth(token)
    }

    /// Request attributed to `scope`: bearer token for users, nothing extra
    /// for sessions (the id travels in the URL or body).
    fn scoped(&self, method: Method, url: &str, scope: &Scope) -> RequestBuilder {
        match scope.bearer_token() {
            Some(token) => self.bearer(method, url, token),
            None => self.request(method, url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(api_key: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "https://lemonlensapp.com/api/v1/".into(),
            api_key: api_key.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ApiClient::new(&ApiConfig {
            base_url: "ftp://nope".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn session_scope_goes_in_query() {
        let c = client("");
        let scope = Scope::Session {
            session_id: "a b&c".into(),
        };
        assert_eq!(
            c.scoped_url("/reports", &scope),
            "https://lemonlensapp.com/api/v1/reports?session_id=a%20b%26c"
        );
    }

    #[test]
    fn user_scope_uses_bearer_header() {
        let c = client("");
        let scope = Scope::User {
            user_id: "7".into(),
            token: "tok".into(),
        };
        let url = c.scoped_url("reports/5", &scope);
        assert_eq!(url, "https://lemonlensapp.com/api/v1/reports/5");

        let req = c.scoped(Method::GET, &url, &scope).build().unwrap();
        assert_eq!(
            req.headers().get(header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
        assert!(req.headers().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn api_key_header_when_configured() {
        let c = client("k-123");
        let req = c.request(Method::GET, &c.url("session")).build().unwrap();
        assert_eq!(req.headers().get(API_KEY_HEADER).unwrap(), "k-123");
        assert_eq!(
            req.headers().get(header::ACCEPT).unwrap(),
            "application/json"
        );
    }
}
