use lemon_core::Identity;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;
use crate::output::output;

/// Identity as shown by `session show` and `auth status`. Never includes the
/// bearer token.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub state: &'static str,
    pub session_id: Option<String>,
    pub session_expires_at: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub credits: Option<u32>,
    pub token_source: Option<&'static str>,
}

impl IdentityResponse {
    pub fn new(identity: &Identity, token_source: Option<&'static str>) -> Self {
        let mut response = Self {
            state: "unidentified",
            session_id: None,
            session_expires_at: None,
            user_id: None,
            name: None,
            email: None,
            credits: None,
            token_source: None,
        };
        match identity {
            Identity::Unidentified => {}
            Identity::Anonymous(session) => {
                response.state = "anonymous";
                response.session_id = Some(session.session_id.clone());
                response.session_expires_at = Some(session.expires_at.to_rfc3339());
            }
            Identity::Authenticated(user) => {
                response.state = "authenticated";
                response.user_id = Some(user.user_id.clone());
                response.name = Some(user.display_name.clone());
                response.email = Some(user.email.clone());
                response.credits = Some(user.credits);
                response.token_source = token_source;
            }
        }
        response
    }
}

/// Handle `lemonlens session <subcommand>`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Show => output(
            &IdentityResponse::new(&ctx.auth.identity(), None),
            flags.format,
        ),
        SessionCommands::Reset => {
            let session = ctx.auth.reset_session().await?;
            output(
                &IdentityResponse::new(&Identity::Anonymous(session), None),
                flags.format,
            )
        }
    }
}
