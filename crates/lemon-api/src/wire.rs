//! Request and response bodies as they travel over the wire.

use lemon_core::{AuthenticatedUser, ReportInput};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Anonymous session whose reports the server should migrate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleLoginRequest {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// User record as the API returns it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "username")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub credits: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    #[serde(alias = "access_token")]
    pub token: String,
    /// Present when the server reports on session migration.
    #[serde(default)]
    pub migrated_reports: Option<u32>,
    /// Set when authentication succeeded but the session's reports could not
    /// be moved to the account.
    #[serde(default)]
    pub migration_error: Option<String>,
}

impl AuthResponse {
    #[must_use]
    pub fn into_user(self) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: self.user.id,
            display_name: self.user.name,
            email: self.user.email,
            auth_token: self.token,
            credits: self.user.credits.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReportBody<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub mileage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<&'a str>,
    #[serde(rename = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<&'a str>,
    #[serde(rename = "listingLink", skip_serializing_if = "Option::is_none")]
    pub listing_link: Option<&'a str>,
    #[serde(rename = "additionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<&'a str>,
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

impl<'a> CreateReportBody<'a> {
    #[must_use]
    pub fn new(input: &'a ReportInput, session_id: Option<&'a str>) -> Self {
        let non_blank = |v: &'a Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty());
        Self {
            make: input.make.trim(),
            model: input.model.trim(),
            year: input.year,
            mileage: input.wire_mileage(),
            vin: non_blank(&input.vin),
            zip_code: non_blank(&input.zip_code),
            listing_link: non_blank(&input.listing_link),
            additional_info: non_blank(&input.additional_info),
            is_premium: input.is_premium(),
            session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopedBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest<'a> {
    pub price_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub session_url: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
