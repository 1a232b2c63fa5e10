//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! simulation run. It provides:
//! 1. **Defaults:** Baseline geometry and the allocation ceiling.
//! 2. **Geometry:** `CacheConfig`, the validated `(s, E, b)` triple with derived sizes.
//! 3. **Root Config:** `Config`, loadable from JSON, combining geometry with run options.
//!
//! A `CacheConfig` can only be obtained through a validating constructor or
//! deserialization, so every value in circulation describes a buildable cache.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::addr::AddressLayout;
use crate::common::error::{ConfigError, SimError};

/// Default configuration constants for the simulator.
pub mod defaults {
    /// Default number of set index bits (16 sets).
    pub const SET_INDEX_BITS: u32 = 4;

    /// Default associativity (direct-mapped).
    pub const LINES_PER_SET: usize = 1;

    /// Default number of block offset bits (16-byte blocks).
    pub const BLOCK_OFFSET_BITS: u32 = 4;

    /// Largest number of lines (`2^s * E`) a single cache may allocate.
    ///
    /// Sixteen million lines is far beyond any realistic geometry and keeps a
    /// mistyped `-s 60` from requesting exabytes of memory.
    pub const MAX_TOTAL_LINES: u64 = 1 << 24;
}

/// Cache geometry: set index bits `s`, lines per set `E`, block offset bits `b`.
///
/// Derived values: `num_sets = 2^s`, `block_size = 2^b`.
///
/// # Examples
///
/// ```
/// use csim_core::config::CacheConfig;
///
/// let config = CacheConfig::new(4, 2, 4).unwrap();
/// assert_eq!(config.num_sets(), 16);
/// assert_eq!(config.block_size(), 16);
/// assert_eq!(config.capacity_bytes(), 512);
///
/// assert!(CacheConfig::new(0, 1, 4).is_err());
/// assert!(CacheConfig::from_geometry(0, 1, 0).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCacheConfig")]
pub struct CacheConfig {
    set_index_bits: u32,
    lines_per_set: usize,
    block_offset_bits: u32,
}

/// Unvalidated mirror of [`CacheConfig`] used as the deserialization target.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCacheConfig {
    set_index_bits: u32,
    lines_per_set: usize,
    block_offset_bits: u32,
}

impl TryFrom<RawCacheConfig> for CacheConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCacheConfig) -> Result<Self, Self::Error> {
        Self::new(raw.set_index_bits, raw.lines_per_set, raw.block_offset_bits)
    }
}

impl CacheConfig {
    /// Creates a validated geometry.
    ///
    /// Requires `s ≥ 1`, `E ≥ 1`, `b ≥ 1`, `s + b < 64`, and at most
    /// [`defaults::MAX_TOTAL_LINES`] lines in total.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] the triple violates.
    pub const fn new(
        set_index_bits: u32,
        lines_per_set: usize,
        block_offset_bits: u32,
    ) -> Result<Self, ConfigError> {
        if set_index_bits == 0 {
            return Err(ConfigError::ZeroSetIndexBits);
        }
        if block_offset_bits == 0 {
            return Err(ConfigError::ZeroBlockOffsetBits);
        }
        Self::from_geometry(set_index_bits, lines_per_set, block_offset_bits)
    }

    /// Creates a geometry that may use zero index or offset bits.
    ///
    /// `s = 0` models a single fully-associative set and `b = 0` models
    /// byte-sized blocks. Lines per set, tag width and the allocation ceiling
    /// are still enforced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLinesPerSet`], [`ConfigError::AddressBitsExhausted`]
    /// or [`ConfigError::TooManyLines`].
    pub const fn from_geometry(
        set_index_bits: u32,
        lines_per_set: usize,
        block_offset_bits: u32,
    ) -> Result<Self, ConfigError> {
        if lines_per_set == 0 {
            return Err(ConfigError::ZeroLinesPerSet);
        }
        if set_index_bits.saturating_add(block_offset_bits) >= u64::BITS {
            return Err(ConfigError::AddressBitsExhausted {
                set_index_bits,
                block_offset_bits,
            });
        }

        // s < 64 holds here, so the shift is in range.
        let requested = (1u64 << set_index_bits).saturating_mul(lines_per_set as u64);
        if requested > defaults::MAX_TOTAL_LINES {
            return Err(ConfigError::TooManyLines {
                requested,
                limit: defaults::MAX_TOTAL_LINES,
            });
        }

        Ok(Self {
            set_index_bits,
            lines_per_set,
            block_offset_bits,
        })
    }

    /// Number of set index bits (`s`).
    pub const fn set_index_bits(&self) -> u32 {
        self.set_index_bits
    }

    /// Number of lines per set (`E`).
    pub const fn lines_per_set(&self) -> usize {
        self.lines_per_set
    }

    /// Number of block offset bits (`b`).
    pub const fn block_offset_bits(&self) -> u32 {
        self.block_offset_bits
    }

    /// Number of sets (`2^s`).
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_index_bits
    }

    /// Block size in bytes (`2^b`).
    pub const fn block_size(&self) -> u64 {
        1u64 << self.block_offset_bits
    }

    /// Total number of lines across all sets.
    pub const fn total_lines(&self) -> usize {
        self.num_sets() * self.lines_per_set
    }

    /// Data capacity in bytes (`2^s * E * 2^b`), saturating at `u64::MAX`.
    pub const fn capacity_bytes(&self) -> u64 {
        (self.total_lines() as u64).saturating_mul(self.block_size())
    }

    /// Address field layout for this geometry.
    pub const fn layout(&self) -> AddressLayout {
        AddressLayout::new(self.set_index_bits, self.block_offset_bits)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_index_bits: defaults::SET_INDEX_BITS,
            lines_per_set: defaults::LINES_PER_SET,
            block_offset_bits: defaults::BLOCK_OFFSET_BITS,
        }
    }
}

/// What a run does with a trace line that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log the line, count it, and continue with the next record.
    #[default]
    Skip,
    /// Stop the run with an error.
    Abort,
}

/// General run options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Print every trace record with its hit/miss/eviction outcome.
    #[serde(default)]
    pub verbose: bool,
    /// Handling of malformed trace lines.
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use csim_core::config::{Config, MalformedPolicy};
///
/// let json = r#"{
///     "general": { "verbose": true, "on_malformed": "abort" },
///     "cache": { "set_index_bits": 5, "lines_per_set": 1, "block_offset_bits": 5 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.verbose);
/// assert_eq!(config.general.on_malformed, MalformedPolicy::Abort);
/// assert_eq!(config.cache.num_sets(), 32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General run options.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache geometry.
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON, unknown fields, or
    /// an invalid geometry.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if its contents do not deserialize.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SimError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
