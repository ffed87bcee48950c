use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckoutArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CheckoutResponse {
    url: String,
    opened: bool,
}

/// Handle `lemonlens checkout <price_id>`: create a hosted checkout session
/// and hand it to the browser.
pub async fn handle(args: &CheckoutArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let identity = ctx.auth.identity();
    let Some(user) = identity.user() else {
        anyhow::bail!("buying credits requires an account; run `lemonlens auth login`");
    };
    let url = ctx.api.checkout(&user.auth_token, &args.price_id).await?;

    let opened = !args.no_open
        && match open::that(&url) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "could not open browser");
                false
            }
        };
    output(&CheckoutResponse { url, opened }, flags.format)
}
