use std::io::BufRead;

use anyhow::Context;
use lemon_auth::{GoogleConsent, Registration};
use lemon_core::AuthenticatedUser;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::cli::subcommands::auth::PasswordArgs;
use crate::commands::session::IdentityResponse;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Spinner;

#[derive(Serialize)]
struct LoginResponse {
    authenticated: bool,
    user_id: String,
    name: String,
    email: String,
    credits: u32,
}

impl From<AuthenticatedUser> for LoginResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            authenticated: true,
            user_id: user.user_id,
            name: user.display_name,
            email: user.email,
            credits: user.credits,
        }
    }
}

/// Handle `lemonlens auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let auth = &ctx.auth;
    match action {
        AuthCommands::Login(args) => {
            let password = read_password(&args.password)?;
            let user = auth.login(&args.email, &password).await?;
            output(&LoginResponse::from(user), flags.format)
        }
        AuthCommands::Register(args) => {
            let password = read_password(&args.password)?;
            let form = Registration {
                display_name: args.name.clone(),
                email: args.email.clone(),
                password_confirmation: args
                    .password_confirmation
                    .clone()
                    .unwrap_or_else(|| password.clone()),
                password,
            };
            let user = auth.register(&form).await?;
            output(&LoginResponse::from(user), flags.format)
        }
        AuthCommands::Google => {
            let consent = GoogleConsent::from_config(&ctx.config.google)?;
            let user = {
                let _spinner = Spinner::start("Waiting for Google sign-in in your browser…");
                auth.login_with_google(&consent).await?
            };
            output(&LoginResponse::from(user), flags.format)
        }
        AuthCommands::Logout => {
            let identity = auth.logout().await?;
            auth.wait_for_remote_logout().await;
            output(&IdentityResponse::new(&identity, None), flags.format)
        }
        AuthCommands::Status => output(
            &IdentityResponse::new(&auth.identity(), ctx.token_source()),
            flags.format,
        ),
    }
}

fn read_password(args: &PasswordArgs) -> anyhow::Result<String> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    if !args.password_stdin {
        anyhow::bail!("pass --password or --password-stdin");
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("empty password on stdin");
    }
    Ok(password)
}
