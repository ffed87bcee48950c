//! Periodic report list refresh that also re-runs on identity changes.

use std::sync::Arc;
use std::time::Duration;

use lemon_api::{AuthApi, ReportApi, SessionApi};
use lemon_core::Report;
use tokio::time::{Instant, sleep_until};

use crate::error::ReportError;
use crate::poller::StopSignal;
use crate::service::ReportService;

/// Emit the list now, then every `interval` and after every identity
/// transition, until `stop` fires. Errors are reported and the loop continues.
pub async fn watch_list<A>(
    service: &ReportService<A>,
    interval: Duration,
    mut stop: StopSignal,
    mut on_update: impl FnMut(&Result<Arc<Vec<Report>>, ReportError>),
) where
    A: SessionApi + AuthApi + ReportApi + 'static,
{
    let mut identity = service.auth().subscribe();
    identity.mark_unchanged();
    on_update(&service.list_reports().await);
    let mut next_tick = Instant::now() + interval;

    loop {
        tokio::select! {
            biased;

            () = stop.stopped() => break,
            changed = identity.changed() => {
                if changed.is_err() {
                    break;
                }
                identity.mark_unchanged();
                on_update(&service.list_reports().await);
            }
            () = sleep_until(next_tick) => {
                on_update(&service.refresh_reports().await);
                next_tick = Instant::now() + interval;
            }
        }
    }
}
