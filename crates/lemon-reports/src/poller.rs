//! Report status polling.
//!
//! A three-state scheduler:
//!
//! | tier         | when                                                    | interval |
//! |--------------|---------------------------------------------------------|----------|
//! | `IdleSlow`   | nothing observed yet, or pending without a start time   | slow     |
//! | `ActiveFast` | non-terminal and started (`created_at` or `processing`) | fast     |
//! | `Stopped`    | terminal status, report missing, or [`StopHandle::stop`] | none     |
//!
//! [`Poller`] is the pure state machine; [`Poller::run`] drives it with tokio
//! timers. A tick fires on schedule even while an earlier fetch is still in
//! flight; responses are applied in arrival order.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use lemon_config::PollingConfig;
use lemon_core::{Report, ReportStatus};
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    IdleSlow,
    ActiveFast,
    Stopped,
}

impl Tier {
    /// Tier implied by the latest observation.
    #[must_use]
    pub fn for_report(report: Option<&Report>) -> Self {
        match report {
            None => Self::IdleSlow,
            Some(r) if r.status.is_terminal() => Self::Stopped,
            Some(r) if r.status == ReportStatus::Processing || r.created_at.is_some() => {
                Self::ActiveFast
            }
            Some(_) => Self::IdleSlow,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdleSlow => "idle-slow",
            Self::ActiveFast => "active-fast",
            Self::Stopped => "stopped",
        }
    }
}

/// Interval per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub slow: Duration,
    pub fast: Duration,
}

impl PollSchedule {
    #[must_use]
    pub const fn from_config(config: &PollingConfig) -> Self {
        Self {
            slow: config.slow(),
            fast: config.fast(),
        }
    }

    /// `None` once polling has stopped.
    #[must_use]
    pub const fn interval(&self, tier: Tier) -> Option<Duration> {
        match tier {
            Tier::IdleSlow => Some(self.slow),
            Tier::ActiveFast => Some(self.fast),
            Tier::Stopped => None,
        }
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

/// What a single fetch produced.
#[derive(Debug)]
pub enum PollEvent {
    Updated { report: Report, tier: Tier },
    /// The fetch succeeded but the report does not exist.
    Missing,
    /// Transient failure; the tier is unchanged and polling continues.
    Failed(ReportError),
    /// Polling ended through [`StopHandle::stop`] or by dropping the handle.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Poller {
    schedule: PollSchedule,
    tier: Tier,
    latest: Option<Report>,
    missing: bool,
    retry_grace: u8,
}

impl Poller {
    #[must_use]
    pub const fn new(schedule: PollSchedule) -> Self {
        Self {
            schedule,
            tier: Tier::IdleSlow,
            latest: None,
            missing: false,
            retry_grace: 0,
        }
    }

    /// Start from a report already in hand, e.g. right after a retry.
    #[must_use]
    pub fn resume_from(schedule: PollSchedule, report: Report) -> Self {
        Self {
            schedule,
            tier: Tier::for_report(Some(&report)),
            latest: Some(report),
            missing: false,
            retry_grace: 0,
        }
    }

    /// [`Self::resume_from`] for a report the client just retried.
    ///
    /// The first `failed` observation is taken as the server not having
    /// picked up the retry yet: the local report and the fast tier are kept
    /// for one more tick. A second `failed` stops as usual.
    #[must_use]
    pub fn after_retry(schedule: PollSchedule, report: Report) -> Self {
        Self {
            retry_grace: 1,
            ..Self::resume_from(schedule, report)
        }
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&Report> {
        self.latest.as_ref()
    }

    /// True when the last successful fetch found no report.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.missing
    }

    #[must_use]
    pub const fn next_interval(&self) -> Option<Duration> {
        self.schedule.interval(self.tier)
    }

    /// Apply a fetch result and return the resulting tier.
    pub fn observe(&mut self, fetched: Option<Report>) -> Tier {
        if self.tier == Tier::Stopped {
            return self.tier;
        }
        match fetched {
            Some(report) if report.status == ReportStatus::Failed && self.retry_grace > 0 => {
                self.retry_grace -= 1;
                tracing::debug!("report still failed right after retry; polling again");
            }
            Some(report) => {
                self.retry_grace = 0;
                self.tier = Tier::for_report(Some(&report));
                self.latest = Some(report);
                self.missing = false;
            }
            None => {
                self.tier = Tier::Stopped;
                self.missing = true;
            }
        }
        self.tier
    }

    pub const fn stop(&mut self) {
        self.tier = Tier::Stopped;
    }

    /// Poll until a terminal state, a missing report, or `stop`.
    ///
    /// `fetch` is called immediately and then on every tick. Each result is
    /// reported through `on_event` before the next scheduling decision.
    pub async fn run<F, Fut>(
        mut self,
        fetch: F,
        mut stop: StopSignal,
        mut on_event: impl FnMut(&PollEvent),
    ) -> Self
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Option<Report>, ReportError>>,
    {
        let Some(interval) = self.next_interval() else {
            return self;
        };
        let mut in_flight = FuturesUnordered::new();
        in_flight.push(fetch());
        let mut next_tick = Instant::now() + interval;

        loop {
            tokio::select! {
                biased;

                () = stop.stopped() => {
                    self.stop();
                    on_event(&PollEvent::Cancelled);
                    break;
                }
                Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                    let before = self.tier;
                    let event = match result {
                        Ok(fetched) => {
                            let missing = fetched.is_none();
                            let tier = self.observe(fetched);
                            match (missing, self.latest.clone()) {
                                (false, Some(report)) => PollEvent::Updated { report, tier },
                                _ => PollEvent::Missing,
                            }
                        }
                        Err(error) => {
                            tracing::warn!(%error, "report poll failed; will retry");
                            PollEvent::Failed(error)
                        }
                    };
                    on_event(&event);
                    match self.next_interval() {
                        None => break,
                        Some(interval) if self.tier != before => {
                            tracing::debug!(from = before.as_str(), to = self.tier.as_str(), "poll tier changed");
                            next_tick = Instant::now() + interval;
                        }
                        Some(_) => {}
                    }
                }
                () = sleep_until(next_tick) => {
                    in_flight.push(fetch());
                    let Some(interval) = self.next_interval() else { break };
                    next_tick = Instant::now() + interval;
                }
            }
        }
        self
    }
}

/// Ends a running [`Poller::run`]. Dropping it has the same effect.
#[derive(Debug)]
pub struct StopHandle(watch::Sender<bool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug)]
pub struct StopSignal(watch::Receiver<bool>);

impl StopSignal {
    /// Resolves once [`StopHandle::stop`] is called or the handle is dropped.
    pub async fn stopped(&mut self) {
        // A closed channel means the handle is gone, which stops too.
        let _ = self.0.wait_for(|stop| *stop).await;
    }
}

#[must_use]
pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle(tx), StopSignal(rx))
}
