//! Trace-driven set-associative cache simulator library.
//!
//! This crate replays a recorded sequence of memory accesses against a
//! configurable cache and reports exact hit, miss and eviction counts:
//! 1. **Geometry:** `2^s` sets of `E` lines holding `2^b`-byte blocks, validated up front.
//! 2. **Cache:** Address decomposition, set/line storage and true LRU replacement.
//! 3. **Traces:** Parsing and streaming Valgrind `lackey`-style memory traces.
//! 4. **Simulation:** Dispatching records (modify = load + store) and collecting statistics.
//!
//! # Example
//!
//! ```
//! use csim_core::{CacheConfig, Simulator};
//!
//! let config = CacheConfig::new(4, 1, 4).unwrap();
//! let mut sim = Simulator::new(&config).unwrap();
//! let trace = " L 10,1\n M 20,1\n L 22,1\n S 18,1\n L 110,1\n L 210,1\n M 12,1\n";
//!
//! let summary = sim.run(trace.as_bytes()).unwrap();
//! assert_eq!(summary.stats.to_string(), "hits:4 misses:5 evictions:3");
//! ```

/// Common types (address decomposition, errors).
pub mod common;
/// Simulator configuration (geometry, run options, JSON loading).
pub mod config;
/// Cache store and LRU replacement engine.
pub mod cache;
/// Trace records, parsing and streaming.
pub mod trace;
/// Simulation context and record dispatch.
pub mod sim;
/// Hit/miss/eviction counters and reporting.
pub mod stats;

/// Validated cache geometry; construct with `CacheConfig::new`.
pub use crate::config::CacheConfig;
/// Root configuration type; deserialize from JSON with `Config::from_json`.
pub use crate::config::Config;
/// Simulation context; owns the cache and counters for one run.
pub use crate::sim::Simulator;
/// Access counters.
pub use crate::stats::SimStats;
