//! Shared HTTP response classification.
//!
//! Every endpoint funnels its response through [`check_response`] so status
//! handling lives in one place:
//! - **402**, or any error body carrying the `Insufficient credits` marker →
//!   [`ApiError::InsufficientCredits`]
//! - **401** → [`ApiError::Unauthorized`], **404** → [`ApiError::NotFound`],
//!   **422** → [`ApiError::Validation`]
//! - **429** → [`ApiError::RateLimited`] (`Retry-After`, default 60 s)
//! - other non-success → [`ApiError::Api`]

use serde_json::Value;

use crate::error::ApiError;

const CREDITS_MARKER: &str = "insufficient credits";

/// Check an HTTP response for error conditions, returning it unchanged on success.
///
/// # Errors
///
/// Returns the [`ApiError`] variant matching the status code and body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status().as_u16();
    if status == 429 {
        return Err(ApiError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if resp.status().is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(classify(status, &body))
}

/// Map a non-success status and its body onto an [`ApiError`].
#[must_use]
pub fn classify(status: u16, body: &str) -> ApiError {
    let json = serde_json::from_str::<Value>(body).ok();
    let message = json
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| body.trim().to_string());

    if status == 402 || message.to_ascii_lowercase().contains(CREDITS_MARKER) {
        let count = |key: &str| {
            json.as_ref()
                .and_then(|v| v.get(key))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
        };
        return ApiError::InsufficientCredits {
            required: count("required_credits"),
            current: count("current_credits"),
            message,
        };
    }

    match status {
        401 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        422 => ApiError::Validation(message),
        _ => ApiError::Api { status, message },
    }
}

fn error_message(value: &Value) -> Option<String> {
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn insufficient_credits_body_is_distinguished() {
        let resp = mock_response(
            402,
            r#"{"error":"Insufficient credits","required_credits":1,"current_credits":0}"#,
        );
        let err = check_response(resp).await.unwrap_err();
        match err {
            ApiError::InsufficientCredits {
                required,
                current,
                message,
            } => {
                assert_eq!(required, Some(1));
                assert_eq!(current, Some(0));
                assert_eq!(message, "Insufficient credits");
            }
            other => panic!("expected credits error, got {other:?}"),
        }
    }

    #[test]
    fn credits_marker_on_other_status_is_still_credits() {
        let err = classify(400, r#"{"message":"Insufficient credits for premium report"}"#);
        assert!(matches!(err, ApiError::InsufficientCredits { .. }));
    }

    #[test]
    fn bare_402_without_json() {
        let err = classify(402, "Payment Required");
        assert!(matches!(
            err,
            ApiError::InsufficientCredits {
                required: None,
                current: None,
                ..
            }
        ));
    }

    #[test]
    fn generic_statuses() {
        assert!(matches!(classify(401, r#"{"message":"Invalid credentials"}"#), ApiError::Unauthorized(m) if m == "Invalid credentials"));
        assert!(matches!(classify(404, ""), ApiError::NotFound(_)));
        assert!(matches!(classify(422, r#"{"message":"The email has already been taken."}"#), ApiError::Validation(_)));
        assert!(matches!(classify(500, "boom"), ApiError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn rate_limited_reads_retry_after() {
        let resp = reqwest::Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", "17")
                .body(String::new())
                .unwrap(),
        );
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { retry_after_secs: 17 }));
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = mock_response(201, "{}");
        assert!(check_response(resp).await.is_ok());
    }

    #[test]
    fn transient_classification() {
        assert!(classify(503, "").is_transient());
        assert!(!classify(402, "").is_transient());
        assert!(!classify(404, "").is_transient());
    }
}
