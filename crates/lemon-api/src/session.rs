//! Anonymous session issuance.

use reqwest::Method;

use crate::{ApiClient, ApiError, SessionApi, http::check_response, wire::SessionResponse};

impl SessionApi for ApiClient {
    async fn issue_session(&self) -> Result<String, ApiError> {
        let url = self.url("session");
        let resp = check_response(self.request(Method::GET, &url).send().await?).await?;
        let body: SessionResponse = resp.json().await?;
        session_id_from(body)
    }
}

fn session_id_from(body: SessionResponse) -> Result<String, ApiError> {
    body.session_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Parse("session response carried no session_id".into()))
}
