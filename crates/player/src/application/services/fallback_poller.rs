//! Fallback Poller - pull-based refresh while the push channel is down
//!
//! A single poller per session. Start and stop are idempotent, and the session stops it
//! explicitly when the channel opens, so two polling schedules can never overlap.

use std::time::Duration;

use tokio::time::Instant;

use crate::infrastructure::messaging::ConnectionState;

/// What to do on a poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Fetch the board
    Fetch,
    /// Channel is connected again; keep the schedule but skip this fetch
    Skip,
    /// Session left playing; the poller has stopped itself
    Stopped,
}

#[derive(Debug, Default)]
pub struct FallbackPoller {
    interval: Option<Duration>,
    next_tick: Option<Instant>,
    fetches_issued: u64,
}

impl FallbackPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    /// Begin polling every `interval`, first tick one interval from `now`.
    ///
    /// A start while already running is a no-op and returns false.
    pub fn start(&mut self, interval: Duration, now: Instant) -> bool {
        if self.is_active() {
            tracing::debug!("Fallback polling already running");
            return false;
        }
        tracing::info!(interval_ms = interval.as_millis() as u64, "Starting fallback polling");
        self.interval = Some(interval);
        self.next_tick = Some(now + interval);
        true
    }

    /// Returns false if the poller was not running.
    pub fn stop(&mut self) -> bool {
        if self.interval.take().is_none() {
            return false;
        }
        self.next_tick = None;
        tracing::info!(fetches = self.fetches_issued, "Stopped fallback polling");
        true
    }

    /// A tick elapsed. Reschedules and decides whether to fetch.
    pub fn on_tick(
        &mut self,
        now: Instant,
        playing: bool,
        connection: ConnectionState,
    ) -> PollDecision {
        let Some(interval) = self.interval else {
            return PollDecision::Stopped;
        };
        if !playing {
            self.stop();
            return PollDecision::Stopped;
        }

        self.next_tick = Some(now + interval);
        if connection == ConnectionState::Connected {
            return PollDecision::Skip;
        }
        self.fetches_issued += 1;
        PollDecision::Fetch
    }
}
