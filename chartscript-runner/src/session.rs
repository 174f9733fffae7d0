//! Stateful overlay session: owns a chart's candles and scripts and publishes
//! recomputed overlays.
//!
//! Recomputation is split into `begin` (snapshot inputs under a ticket),
//! `RecomputeJob::run` (pure, may run on another thread) and `commit`. A commit
//! whose ticket predates the latest input change is rejected, so a slow job can
//! never overwrite output for newer inputs.

use chartscript_core::domain::Candle;
use chartscript_core::fingerprint::InputFingerprint;
use chartscript_core::{compute_overlays, OverlaySet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("stale recompute (ticket generation {ticket}, current {current})")]
    Stale { ticket: u64, current: u64 },
}

/// Identifies the inputs a recompute was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeTicket {
    pub generation: u64,
    pub fingerprint: InputFingerprint,
}

/// A snapshot of session inputs ready to compute.
#[derive(Debug, Clone)]
pub struct RecomputeJob {
    pub ticket: RecomputeTicket,
    candles: Vec<Candle>,
    scripts: Vec<String>,
}

impl RecomputeJob {
    pub fn run(&self) -> OverlaySet {
        compute_overlays(&self.candles, &self.scripts)
    }
}

#[derive(Debug, Default)]
pub struct OverlaySession {
    candles: Vec<Candle>,
    scripts: Vec<String>,
    generation: u64,
    published: Option<(RecomputeTicket, OverlaySet)>,
}

impl OverlaySession {
    pub fn new(candles: Vec<Candle>, scripts: Vec<String>) -> Self {
        Self {
            candles,
            scripts,
            ..Self::default()
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn replace_candles(&mut self, candles: Vec<Candle>) {
        self.candles = candles;
        self.bump();
    }

    pub fn add_script(&mut self, script: impl Into<String>) {
        self.scripts.push(script.into());
        self.bump();
    }

    /// Remove the script at `index`; returns it, or `None` if out of range.
    pub fn remove_script(&mut self, index: usize) -> Option<String> {
        if index >= self.scripts.len() {
            return None;
        }
        let removed = self.scripts.remove(index);
        self.bump();
        Some(removed)
    }

    fn bump(&mut self) {
        self.generation += 1;
        debug!(generation = self.generation, "session inputs changed");
    }

    /// Snapshot the current inputs.
    pub fn begin(&self) -> RecomputeJob {
        RecomputeJob {
            ticket: RecomputeTicket {
                generation: self.generation,
                fingerprint: InputFingerprint::compute(&self.candles, &self.scripts),
            },
            candles: self.candles.clone(),
            scripts: self.scripts.clone(),
        }
    }

    /// Publish `overlays` if `ticket` still matches the current inputs.
    pub fn commit(
        &mut self,
        ticket: RecomputeTicket,
        overlays: OverlaySet,
    ) -> Result<&OverlaySet, CommitError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale recompute"
            );
            return Err(CommitError::Stale {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        info!(
            generation = ticket.generation,
            fingerprint = ticket.fingerprint.short(),
            results = overlays.results.len(),
            markers = overlays.markers.len(),
            "published overlays"
        );
        let (_, published) = self.published.insert((ticket, overlays));
        Ok(published)
    }

    /// Begin, run and commit synchronously.
    pub fn recompute(&mut self) -> Result<&OverlaySet, CommitError> {
        let job = self.begin();
        let overlays = job.run();
        self.commit(job.ticket, overlays)
    }

    /// The most recently published overlays, if any.
    pub fn published(&self) -> Option<&OverlaySet> {
        self.published.as_ref().map(|(_, set)| set)
    }

    pub fn published_ticket(&self) -> Option<&RecomputeTicket> {
        self.published.as_ref().map(|(ticket, _)| ticket)
    }

    /// True when the published overlays reflect the current inputs.
    pub fn is_current(&self) -> bool {
        self.published_ticket()
            .is_some_and(|t| t.generation == self.generation)
    }
}
