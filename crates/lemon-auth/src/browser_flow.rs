use std::future::Future;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lemon_config::GoogleConfig;

use crate::error::AuthError;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const SCOPES: &str = "openid email profile";

/// Source of a third-party access token for federated sign-in.
pub trait ConsentFlow: Send + Sync {
    /// Obtain an access token. A user cancel maps to
    /// [`AuthError::ConsentCancelled`].
    fn obtain_token(&self) -> impl Future<Output = Result<String, AuthError>> + Send;
}

/// Google implicit-grant consent via the system browser and a localhost
/// callback.
///
/// 1. Bind `tiny_http` on `127.0.0.1:0`
/// 2. Open the browser at Google's consent page with a random `state`
/// 3. Google redirects to `/callback#access_token=...`; the callback page
///    forwards the fragment to `/token?...` so the server can read it
/// 4. Verify `state`, return the access token
#[derive(Debug, Clone)]
pub struct GoogleConsent {
    client_id: String,
    timeout: Duration,
}

impl GoogleConsent {
    /// # Errors
    ///
    /// Returns [`AuthError::NotConfigured`] without a client id.
    pub fn from_config(config: &GoogleConfig) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured("google.client_id".into()));
        }
        Ok(Self {
            client_id: config.client_id.clone(),
            timeout: Duration::from_secs(config.consent_timeout_secs),
        })
    }
}

impl ConsentFlow for GoogleConsent {
    async fn obtain_token(&self) -> Result<String, AuthError> {
        let server = tiny_http::Server::http("127.0.0.1:0")
            .map_err(|e| AuthError::ConsentFailed(format!("failed to bind: {e}")))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .ok_or_else(|| AuthError::ConsentFailed("no port".into()))?;

        let state = random_state()?;
        let redirect_uri = format!("http://127.0.0.1:{port}/callback");
        let consent_url = consent_url(&self.client_id, &redirect_uri, &state);

        eprintln!("Opening browser to: {consent_url}");
        if let Err(error) = open::that(&consent_url) {
            eprintln!("Failed to open browser: {error}");
            eprintln!("Open the URL above manually, then return here.");
        }

        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || wait_for_callback(&server, timeout, &state))
            .await
            .map_err(|e| AuthError::ConsentFailed(format!("spawn_blocking join: {e}")))?
    }
}

fn random_state() -> Result<String, AuthError> {
    let mut nonce = [0u8; 16];
    getrandom::fill(&mut nonce)
        .map_err(|e| AuthError::ConsentFailed(format!("failed to generate state nonce: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(nonce))
}

fn consent_url(client_id: &str, redirect_uri: &str, state: &str) -> String {
    format!(
        "{GOOGLE_AUTH_URL}?client_id={}&redirect_uri={}&response_type=token&scope={}&state={}&prompt=select_account",
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(SCOPES),
        urlencoding::encode(state),
    )
}

/// Page served at `/callback`: the token arrives in the URL fragment, which
/// browsers never send, so hand it back as a query string.
const FORWARD_PAGE: &str = "<html><body><p>Completing sign-in…</p><script>\
location.replace('/token?' + location.hash.substring(1));\
</script></body></html>";

#[derive(Debug, PartialEq, Eq)]
enum CallbackOutcome {
    Token(String),
    Denied(String),
    StateMismatch,
    Incomplete,
}

fn parse_token_query(query: &str, expected_state: &str) -> Result<CallbackOutcome, AuthError> {
    let mut token = None;
    let mut state = None;
    let mut error = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map_err(|e| AuthError::ConsentFailed(format!("URL decode: {e}")))?
            .into_owned();
        match key {
            "access_token" => token = Some(value),
            "state" => state = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Ok(CallbackOutcome::Denied(error));
    }
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(CallbackOutcome::Incomplete);
    };
    if state.as_deref() != Some(expected_state) {
        return Ok(CallbackOutcome::StateMismatch);
    }
    Ok(CallbackOutcome::Token(token))
}

fn html(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_string(body);
    match tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

/// Block until the callback server yields a token, a denial, or the timeout.
///
/// Requests other than `/callback` and `/token` (favicon, refreshes) are
/// answered and ignored.
fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: Duration,
    expected_state: &str,
) -> Result<String, AuthError> {
    let deadline = Instant::now() + timeout;
    let timed_out = || {
        AuthError::ConsentFailed(format!(
            "browser callback timed out after {}s",
            timeout.as_secs()
        ))
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out());
        }
        let request = match server.recv_timeout(remaining) {
            Ok(Some(req)) => req,
            Ok(None) => return Err(timed_out()),
            Err(e) => return Err(AuthError::ConsentFailed(format!("recv error: {e}"))),
        };

        let url = request.url().to_string();
        let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
        match path {
            "/callback" => {
                let _ = request.respond(html(FORWARD_PAGE));
            }
            "/token" => match parse_token_query(query, expected_state)? {
                CallbackOutcome::Token(token) => {
                    let _ = request.respond(html(
                        "<html><body><h1>Signed in</h1><p>You can close this tab.</p></body></html>",
                    ));
                    return Ok(token);
                }
                CallbackOutcome::Denied(reason) => {
                    let _ = request.respond(html(
                        "<html><body><h1>Sign-in cancelled</h1></body></html>",
                    ));
                    tracing::info!(%reason, "consent declined");
                    return Err(AuthError::ConsentCancelled);
                }
                CallbackOutcome::StateMismatch => {
                    let _ = request.respond(html(
                        "<html><body><h1>Sign-in failed</h1><p>State mismatch. Check CLI output.</p></body></html>",
                    ));
                    return Err(AuthError::ConsentFailed("state mismatch, possible CSRF".into()));
                }
                CallbackOutcome::Incomplete => {
                    let _ = request.respond(html(
                        "<html><body><h1>Waiting for sign-in…</h1></body></html>",
                    ));
                }
            },
            _ => {
                let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            }
        }
    }
}
