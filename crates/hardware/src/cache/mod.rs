//! Set-Associative Cache Model.
//!
//! This module implements the functional cache: a fixed grid of `2^s` sets by
//! `E` lines, and the replacement engine that resolves each access. It models:
//! 1. **Lookup:** Decomposing the address and scanning the target set for a valid matching tag.
//! 2. **Fill:** Installing the block into the lowest-index invalid line on a cold miss.
//! 3. **Eviction:** Replacing the least recently used line when the set is full.
//!
//! No data, dirty state or timing is modelled; only residency.

/// Least-recently-used victim selection and the global recency clock.
pub mod lru;

use std::fmt;

use serde::Serialize;

use self::lru::LruPolicy;
use crate::common::addr::AddressLayout;
use crate::common::error::ConfigError;
use crate::config::CacheConfig;

/// Cache line entry containing validity, tag, and recency stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether the line holds a block.
    pub valid: bool,
    /// Tag of the resident block (meaningless while invalid).
    pub tag: u64,
    /// Recency clock value at the last hit or fill; 0 if never touched.
    pub recency: u64,
}

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    /// The block was resident.
    Hit,
    /// The block was absent and filled an empty line.
    Miss,
    /// The block was absent and replaced the set's LRU line.
    MissWithEviction,
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }

    /// Returns `true` for either miss variant.
    pub const fn is_miss(self) -> bool {
        !self.is_hit()
    }

    /// Returns `true` if a resident block was displaced.
    pub const fn is_eviction(self) -> bool {
        matches!(self, Self::MissWithEviction)
    }
}

impl fmt::Display for AccessOutcome {
    /// Formats the outcome the way verbose trace output spells it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::MissWithEviction => "miss eviction",
        })
    }
}

/// Set-associative cache with true LRU replacement.
///
/// Lines are stored in one flat vector; set `i` occupies
/// `lines[i * ways .. (i + 1) * ways]`. The vector is allocated once in
/// [`Cache::new`] and never resized.
#[derive(Debug, Clone)]
pub struct Cache {
    config: CacheConfig,
    layout: AddressLayout,
    lines: Vec<CacheLine>,
    ways: usize,
    policy: LruPolicy,
}

impl Cache {
    /// Creates an empty cache (all lines invalid) for the given geometry.
    ///
    /// # Errors
    ///
    /// Re-validates the structural limits of `config` (lines per set, tag
    /// width, allocation ceiling) and returns the violated [`ConfigError`].
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let config = CacheConfig::from_geometry(
            config.set_index_bits(),
            config.lines_per_set(),
            config.block_offset_bits(),
        )?;

        tracing::debug!(
            sets = config.num_sets(),
            ways = config.lines_per_set(),
            block_bytes = config.block_size(),
            "allocating cache"
        );

        Ok(Self {
            config,
            layout: config.layout(),
            lines: vec![CacheLine::default(); config.total_lines()],
            ways: config.lines_per_set(),
            policy: LruPolicy::new(),
        })
    }

    /// Geometry this cache was built from.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Address layout used for decomposition.
    pub const fn layout(&self) -> AddressLayout {
        self.layout
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.config.num_sets()
    }

    /// Lines per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Current value of the global recency clock.
    pub const fn clock(&self) -> u64 {
        self.policy.clock()
    }

    /// Lines of set `index`, or `None` if the index is out of range.
    pub fn set(&self, index: usize) -> Option<&[CacheLine]> {
        let base = index.checked_mul(self.ways)?;
        let end = base.checked_add(self.ways)?;
        self.lines.get(base..end)
    }

    /// Number of valid lines across the whole cache.
    pub fn valid_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Checks whether the block containing `addr` is resident, without touching LRU state.
    pub fn contains(&self, addr: u64) -> bool {
        let decoded = self.layout.decompose(addr);
        self.set(decoded.set_index)
            .is_some_and(|set| set.iter().any(|l| l.valid && l.tag == decoded.tag))
    }

    /// Accesses the block containing `addr`.
    ///
    /// On a hit the matching line is stamped most recent. On a miss the block
    /// is installed into the lowest-index invalid line, or, when the set is
    /// full, into the line with the smallest recency (lowest index on ties).
    /// Every hit and fill ticks the global clock exactly once. The update is
    /// all-or-nothing: no other line is touched.
    ///
    /// # Panics
    ///
    /// This function will not panic. `set_index < num_sets` because it is
    /// masked to `s` bits, so `base + ways <= lines.len()`.
    pub fn access(&mut self, addr: u64) -> AccessOutcome {
        let decoded = self.layout.decompose(addr);
        let base = decoded.set_index * self.ways;
        let set = &mut self.lines[base..base + self.ways];

        if let Some(line) = set.iter_mut().find(|l| l.valid && l.tag == decoded.tag) {
            self.policy.touch(line);
            tracing::trace!(addr = addr, tag = decoded.tag, set = decoded.set_index, "hit");
            return AccessOutcome::Hit;
        }

        let (way, outcome) = match set.iter().position(|l| !l.valid) {
            Some(way) => (way, AccessOutcome::Miss),
            // A full set of at least one way always has a victim.
            None => (LruPolicy::victim(set).unwrap_or(0), AccessOutcome::MissWithEviction),
        };

        let line = &mut set[way];
        if outcome.is_eviction() {
            tracing::trace!(
                addr = addr,
                set = decoded.set_index,
                way = way,
                victim = self.layout.block_base(line.tag, decoded.set_index),
                "evict"
            );
        }
        line.valid = true;
        line.tag = decoded.tag;
        self.policy.touch(line);
        tracing::trace!(
            addr = addr,
            tag = decoded.tag,
            set = decoded.set_index,
            way = way,
            "fill"
        );

        outcome
    }

    /// Invalidates every line and restarts the recency clock.
    pub fn clear(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy = LruPolicy::new();
    }
}
