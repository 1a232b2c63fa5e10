//! Simulator: owns the cache and its counters for exactly one run.
//!
//! The simulator is the context object every access flows through. It performs:
//! 1. **Dispatch:** Mapping each trace record to zero, one or two cache accesses.
//! 2. **Accounting:** Feeding every access outcome into the hit/miss/eviction counters.
//! 3. **Replay:** Folding a whole trace stream through dispatch, skipping or rejecting malformed lines.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use serde::Serialize;

use crate::cache::{AccessOutcome, Cache};
use crate::common::error::{ConfigError, SimError};
use crate::config::{CacheConfig, MalformedPolicy};
use crate::stats::{SimStats, TraceStats};
use crate::trace::{TraceOp, TraceReader, TraceRecord};

/// Cache accesses performed for one trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchReport {
    /// Instruction fetch; no access.
    Ignored,
    /// Load or store; one access.
    Single(AccessOutcome),
    /// Modify; a load access followed by a store access to the same block.
    Modify {
        /// Outcome of the load half.
        load: AccessOutcome,
        /// Outcome of the store half (always a hit).
        store: AccessOutcome,
    },
}

impl DispatchReport {
    /// Outcomes in the order the accesses were performed.
    pub fn outcomes(self) -> impl Iterator<Item = AccessOutcome> {
        let (first, second) = match self {
            Self::Ignored => (None, None),
            Self::Single(outcome) => (Some(outcome), None),
            Self::Modify { load, store } => (Some(load), Some(store)),
        };
        first.into_iter().chain(second)
    }
}

impl fmt::Display for DispatchReport {
    /// Formats the verbose suffix, e.g. ` miss eviction hit` for a modify.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in self.outcomes() {
            write!(f, " {outcome}")?;
        }
        Ok(())
    }
}

/// Final result of a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Hit, miss and eviction counters.
    #[serde(flatten)]
    pub stats: SimStats,
    /// Trace stream bookkeeping.
    pub trace: TraceStats,
}

/// Simulation context: cache, recency clock and counters for one run.
#[derive(Debug, Clone)]
pub struct Simulator {
    cache: Cache,
    stats: SimStats,
    trace: TraceStats,
    on_malformed: MalformedPolicy,
}

impl Simulator {
    /// Creates a simulator with an empty cache and zeroed counters.
    ///
    /// Malformed trace lines are skipped; see [`Simulator::with_malformed_policy`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if no cache can be built from `config`.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: Cache::new(config)?,
            stats: SimStats::default(),
            trace: TraceStats::default(),
            on_malformed: MalformedPolicy::Skip,
        })
    }

    /// Sets how replays treat malformed trace lines.
    #[must_use]
    pub const fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// The simulated cache.
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Hit, miss and eviction counters so far.
    pub const fn stats(&self) -> SimStats {
        self.stats
    }

    /// Trace bookkeeping so far.
    pub const fn trace_stats(&self) -> TraceStats {
        self.trace
    }

    /// Counters and bookkeeping so far.
    pub const fn summary(&self) -> RunSummary {
        RunSummary {
            stats: self.stats,
            trace: self.trace,
        }
    }

    /// Performs one cache access and counts its outcome.
    pub fn access(&mut self, addr: u64) -> AccessOutcome {
        let outcome = self.cache.access(addr);
        self.stats.record(outcome);
        outcome
    }

    /// Dispatches one trace record.
    ///
    /// Loads and stores access the cache once. A modify accesses it twice at
    /// the same address; the first access leaves the block resident and most
    /// recent, so the second is always a hit. Instruction fetches are counted
    /// as ignored and touch nothing.
    pub fn dispatch(&mut self, record: &TraceRecord) -> DispatchReport {
        self.trace.records += 1;
        match record.op {
            TraceOp::Ignore => {
                self.trace.ignored += 1;
                DispatchReport::Ignored
            }
            TraceOp::Load | TraceOp::Store => DispatchReport::Single(self.access(record.address)),
            TraceOp::Modify => {
                let load = self.access(record.address);
                let store = self.access(record.address);
                debug_assert!(store.is_hit(), "store half of modify missed at {record}");
                DispatchReport::Modify { load, store }
            }
        }
    }

    /// Replays a trace stream and returns the totals.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the stream fails, or
    /// [`SimError::MalformedRecord`] on the first bad line when the policy is
    /// [`MalformedPolicy::Abort`].
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunSummary, SimError> {
        self.replay(TraceReader::new(reader), |_, _| {})
    }

    /// Replays a trace stream, calling `observer` after each dispatched record.
    ///
    /// # Errors
    ///
    /// Same as [`Simulator::run`].
    pub fn run_with<R, F>(&mut self, reader: R, observer: F) -> Result<RunSummary, SimError>
    where
        R: BufRead,
        F: FnMut(&TraceRecord, DispatchReport),
    {
        self.replay(TraceReader::new(reader), observer)
    }

    /// Opens and replays a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TraceOpen`] before any record is processed if the
    /// file cannot be opened; otherwise as [`Simulator::run`].
    pub fn run_file<F>(
        &mut self,
        path: impl AsRef<Path>,
        observer: F,
    ) -> Result<RunSummary, SimError>
    where
        F: FnMut(&TraceRecord, DispatchReport),
    {
        let reader = TraceReader::open(path.as_ref())?;
        tracing::info!(trace = %path.as_ref().display(), "replaying trace file");
        self.replay(reader, observer)
    }

    fn replay<R, F>(
        &mut self,
        records: TraceReader<R>,
        mut observer: F,
    ) -> Result<RunSummary, SimError>
    where
        R: BufRead,
        F: FnMut(&TraceRecord, DispatchReport),
    {
        let config = *self.cache.config();
        tracing::info!(
            s = config.set_index_bits(),
            e = config.lines_per_set(),
            b = config.block_offset_bits(),
            "simulation started"
        );

        for item in records {
            match item {
                Ok(record) => {
                    let report = self.dispatch(&record);
                    observer(&record, report);
                }
                Err(err) if err.is_recoverable() => {
                    self.trace.malformed += 1;
                    if self.on_malformed == MalformedPolicy::Abort {
                        return Err(err.into());
                    }
                    tracing::warn!(error = %err, "skipping malformed trace record");
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(
            hits = self.stats.hits,
            misses = self.stats.misses,
            evictions = self.stats.evictions,
            records = self.trace.records,
            malformed = self.trace.malformed,
            "simulation finished"
        );
        Ok(self.summary())
    }

    /// Empties the cache and zeroes all counters, keeping the geometry and policy.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.stats = SimStats::default();
        self.trace = TraceStats::default();
    }
}
