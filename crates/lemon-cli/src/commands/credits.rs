use serde::Serialize;
use tokio::time::{MissedTickBehavior, interval};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CreditsArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CreditsResponse {
    credits: u32,
}

/// Handle `lemonlens credits [--watch]`.
pub async fn handle(args: &CreditsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !args.watch {
        let credits = ctx.auth.refresh_credits().await?;
        return output(&CreditsResponse { credits }, flags.format);
    }

    let mut ticker = interval(ctx.config.polling.credits());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {}
        }
        match ctx.auth.refresh_credits().await {
            Ok(credits) if last != Some(credits) => {
                last = Some(credits);
                output(&CreditsResponse { credits }, flags.format)?;
            }
            Ok(_) => {}
            Err(error) if last.is_none() => return Err(error.into()),
            Err(error) => tracing::warn!(%error, "credit refresh failed"),
        }
    }
}
