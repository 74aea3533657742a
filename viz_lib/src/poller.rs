//! The snapshot polling loop.
//!
//! One cycle waits for the next tick, fetches a snapshot and hands it to the
//! caller. Failed cycles are skipped; the loop itself never stops on its own.
//! Cycles run strictly one after another, so a response can never be
//! overtaken by the one that follows it.

use crate::error::VizResult;
use common::snapshot::Snapshot;
use std::ops::ControlFlow;

/// Somewhere snapshots come from, usually `GET /api/state`.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn fetch_snapshot(&self) -> VizResult<Snapshot>;
}

/// Paces the loop: resolves when the next cycle may start.
#[allow(async_fn_in_trait)]
pub trait Ticker {
    async fn tick(&mut self);
}

pub struct Poller<S, T> {
    source: S,
    ticker: T,
    skipped: u64,
}

impl<S: SnapshotSource, T: Ticker> Poller<S, T> {
    pub fn new(source: S, ticker: T) -> Self {
        Self {
            source,
            ticker,
            skipped: 0,
        }
    }

    /// Number of cycles dropped because the fetch or decode failed.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Fetch once; failures are logged and yield `None`.
    pub async fn poll_once(&mut self) -> Option<Snapshot> {
        match self.source.fetch_snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                self.skipped += 1;
                tracing::debug!(error = %e, skipped = self.skipped, "Skipping poll cycle");
                None
            }
        }
    }

    /// Run until `on_snapshot` breaks.
    pub async fn run<F>(self, on_snapshot: F)
    where
        F: FnMut(Snapshot) -> ControlFlow<()>,
    {
        self.run_while(|| true, on_snapshot).await;
    }

    /// Like [`run`](Self::run), but also stops before any cycle for which
    /// `keep_going` is false, even if no fetch has succeeded in a while.
    pub async fn run_while<C, F>(mut self, keep_going: C, mut on_snapshot: F)
    where
        C: Fn() -> bool,
        F: FnMut(Snapshot) -> ControlFlow<()>,
    {
        loop {
            if !keep_going() {
                tracing::debug!(skipped = self.skipped, "Poll loop cancelled");
                return;
            }
            self.ticker.tick().await;
            let Some(snapshot) = self.poll_once().await else {
                continue;
            };
            if on_snapshot(snapshot).is_break() {
                tracing::debug!("Poll loop stopped");
                return;
            }
        }
    }
}
