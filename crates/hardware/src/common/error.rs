//! Error definitions.
//!
//! This module defines the error kinds raised by the simulator. It provides:
//! 1. **Configuration Errors:** Geometries that cannot be turned into a cache.
//! 2. **Parse Errors:** Trace lines that do not decode into a record.
//! 3. **Trace Errors:** Malformed records (skippable) versus stream I/O failures (fatal).
//! 4. **Simulation Errors:** The top-level error returned to the command-line front end.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A cache geometry that cannot be simulated.
///
/// Raised before any cache storage is allocated; a [`Cache`](crate::cache::Cache)
/// is never constructed from a configuration that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `s` was zero where at least one set index bit is required.
    #[error("set index bits (-s) must be at least 1")]
    ZeroSetIndexBits,

    /// `b` was zero where at least one block offset bit is required.
    #[error("block offset bits (-b) must be at least 1")]
    ZeroBlockOffsetBits,

    /// `E` was zero; every set needs at least one line.
    #[error("lines per set (-E) must be at least 1")]
    ZeroLinesPerSet,

    /// Index and offset bits leave no room for a tag.
    #[error(
        "set index bits ({set_index_bits}) plus block offset bits ({block_offset_bits}) must be less than 64"
    )]
    AddressBitsExhausted {
        /// Requested set index bits.
        set_index_bits: u32,
        /// Requested block offset bits.
        block_offset_bits: u32,
    },

    /// The geometry needs more lines than the simulator will allocate.
    #[error("cache geometry needs {requested} lines, limit is {limit}")]
    TooManyLines {
        /// Lines the geometry asks for (saturated at `u64::MAX`).
        requested: u64,
        /// Allocation ceiling.
        limit: u64,
    },
}

/// Reason a trace line failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line held no operation.
    #[error("empty record")]
    Empty,

    /// The operation character is not one of `I`, `L`, `S`, `M`.
    #[error("unknown operation '{0}'")]
    UnknownOp(String),

    /// No `address,size` field followed the operation.
    #[error("missing address field")]
    MissingAddress,

    /// The address field had no `,size` suffix.
    #[error("missing access size after address '{0}'")]
    MissingSize(String),

    /// The address is not a hexadecimal number that fits in 64 bits.
    #[error("invalid hex address '{0}'")]
    InvalidAddress(String),

    /// The size is not a decimal unsigned integer.
    #[error("invalid access size '{0}'")]
    InvalidSize(String),

    /// The line is not valid UTF-8.
    #[error("record is not valid UTF-8")]
    InvalidEncoding,
}

/// Failure while pulling records out of a trace stream.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A single line did not decode. The stream remains usable.
    #[error("line {line}: {source}")]
    Malformed {
        /// 1-based line number in the trace.
        line: usize,
        /// Why the line was rejected.
        source: ParseError,
    },

    /// The underlying reader failed. The stream must not be read further.
    #[error("trace read failed: {0}")]
    Io(#[from] io::Error),
}

impl TraceError {
    /// Returns `true` if the error only affects one record and the run may continue.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Top-level simulation error.
#[derive(Debug, Error)]
pub enum SimError {
    /// The cache geometry is invalid.
    #[error("invalid cache configuration: {0}")]
    Config(#[from] ConfigError),

    /// A JSON configuration file could not be read.
    #[error("cannot read configuration file {}: {source}", .path.display())]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A JSON configuration file did not deserialize.
    #[error("cannot parse configuration file {}: {source}", .path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// The trace file could not be opened.
    #[error("cannot open trace file {}: {source}", .path.display())]
    TraceOpen {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A trace line did not decode and the run was configured to stop on it.
    #[error("malformed trace record at line {line}: {source}")]
    MalformedRecord {
        /// 1-based line number in the trace.
        line: usize,
        /// Why the line was rejected.
        source: ParseError,
    },

    /// Reading the trace or writing results failed mid-run.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<TraceError> for SimError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Io(e) => Self::Io(e),
            TraceError::Malformed { line, source } => Self::MalformedRecord { line, source },
        }
    }
}
