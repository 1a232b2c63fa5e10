//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the line whose last access is oldest among the lines of
//! the target set. Instead of a per-set usage stack it keeps a single logical
//! clock for the whole cache: every hit or fill ticks the clock and stamps the
//! touched line with the new value, so the smallest stamp in a set is its LRU
//! line.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `tick()`: O(1)
//!   - `victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** one `u64` per line plus the clock
//! - **Best Case:** Working sets that fit in a set's ways
//! - **Worst Case:** Cyclic scans one block larger than the associativity (every access evicts)

use super::CacheLine;

/// LRU policy state: the global recency clock.
///
/// One clock is shared by every set of a cache, which gives all accesses a
/// total order. Stamps start at 1; a line that has never been touched keeps
/// recency 0.
#[derive(Debug, Clone, Default)]
pub struct LruPolicy {
    clock: u64,
}

impl LruPolicy {
    /// Creates a policy whose clock has not ticked yet.
    pub const fn new() -> Self {
        Self { clock: 0 }
    }

    /// Current clock value (the stamp of the most recent access).
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Advances the clock and returns the new stamp.
    #[inline]
    pub const fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Marks `line` as the most recently used line in the cache.
    #[inline]
    pub const fn touch(&mut self, line: &mut CacheLine) {
        line.recency = self.tick();
    }

    /// Selects the way to evict from a full set.
    ///
    /// Returns the index of the valid line with the smallest recency. Ties go to
    /// the lowest index, so sets that share stamp 0 still evict deterministically.
    /// Returns `None` only for an empty slice.
    pub fn victim(lines: &[CacheLine]) -> Option<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.valid)
            .min_by_key(|&(way, line)| (line.recency, way))
            .map(|(way, _)| way)
    }
}
