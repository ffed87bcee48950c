//! Credit purchase redirect. The payment itself happens on the provider's page.

use reqwest::Method;

use crate::{
    ApiClient, ApiError,
    http::check_response,
    wire::{CheckoutRequest, CheckoutResponse},
};

impl ApiClient {
    /// Start a checkout for `price_id` and return the payment page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] if the response has no `session_url`, or
    /// any transport/status error from the request.
    pub async fn checkout(&self, token: &str, price_id: &str) -> Result<String, ApiError> {
        let url = self.url("stripe/checkout");
        let resp = check_response(
            self.bearer(Method::POST, &url, token)
                .json(&CheckoutRequest { price_id })
                .send()
                .await?,
        )
        .await?;
        let body: CheckoutResponse = resp.json().await?;
        redirect_url(body)
    }
}

fn redirect_url(body: CheckoutResponse) -> Result<String, ApiError> {
    body.session_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::Parse("checkout response carried no session_url".into()))
}
