//! Simulation statistics collection and reporting.
//!
//! This module tracks the results of a simulation run. It provides:
//! 1. **Access Counters:** Hits, misses and evictions, updated once per cache access.
//! 2. **Trace Bookkeeping:** Records dispatched, ignored and skipped as malformed.
//! 3. **Reporting:** The one-line summary, a results file, and a detailed text dump.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::cache::AccessOutcome;

/// Hit, miss and eviction counters for one run.
///
/// The only mutation path is [`SimStats::record`], so `evictions <= misses`
/// always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Accesses whose block was resident.
    pub hits: u64,
    /// Accesses whose block was absent (with or without eviction).
    pub misses: u64,
    /// Misses that displaced a resident block.
    pub evictions: u64,
}

impl SimStats {
    /// Counts one access outcome.
    #[inline]
    pub const fn record(&mut self, outcome: AccessOutcome) {
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::Miss => self.misses += 1,
            AccessOutcome::MissWithEviction => {
                self.misses += 1;
                self.evictions += 1;
            }
        }
    }

    /// Total accesses (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, or `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    /// Fraction of accesses that missed, or `0.0` before any access.
    pub fn miss_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.misses as f64 / n as f64,
        }
    }

    /// Writes `"<hits> <misses> <evictions>\n"` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    pub fn write_results(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(
            path,
            format!("{} {} {}\n", self.hits, self.misses, self.evictions),
        )
    }

    /// Prints a detailed statistics block to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("CACHE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("accesses                 {}", self.accesses());
        println!(
            "hits                     {} ({:.2}%)",
            self.hits,
            self.hit_rate() * 100.0
        );
        println!(
            "misses                   {} ({:.2}%)",
            self.misses,
            self.miss_rate() * 100.0
        );
        println!("evictions                {}", self.evictions);
        println!("----------------------------------------------------------");
    }
}

impl fmt::Display for SimStats {
    /// Formats the summary line: `hits:<h> misses:<m> evictions:<e>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

/// Bookkeeping for the trace stream itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    /// Well-formed records dispatched, including ignored ones.
    pub records: u64,
    /// Instruction-fetch (`I`) records that caused no access.
    pub ignored: u64,
    /// Lines skipped because they did not parse.
    pub malformed: u64,
}
