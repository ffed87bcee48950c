//! Stderr spinner for long waits: report watching and browser consent.

use std::borrow::Cow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const TICK: Duration = Duration::from_millis(120);

/// Cleared on drop unless [`Spinner::fail`] left a message behind.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    /// Start spinning, or do nothing when output is piped, quiet, or not a table.
    #[must_use]
    pub fn start(message: impl Into<Cow<'static, str>>) -> Self {
        if !ui::prefs().progress {
            return Self(None);
        }
        let style = ProgressStyle::with_template("{spinner:.yellow} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style).with_message(message);
        bar.enable_steady_tick(TICK);
        Self(Some(bar))
    }

    pub fn update(&self, message: impl Into<Cow<'static, str>>) {
        if let Some(bar) = &self.0 {
            bar.set_message(message);
        }
    }

    pub fn fail(&self, message: impl Into<Cow<'static, str>>) {
        if let Some(bar) = &self.0 {
            bar.abandon_with_message(message);
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.0.take()
            && !bar.is_finished()
        {
            bar.finish_and_clear();
        }
    }
}
