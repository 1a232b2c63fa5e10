//! Common types shared across the cache simulator.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Address Decomposition:** Splitting a 64-bit address into tag, set index and block offset.
//! 2. **Error Handling:** Configuration, parse, trace and top-level simulation errors.

/// Address layout and decomposition.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{AddressLayout, DecodedAddr};
pub use error::{ConfigError, ParseError, SimError, TraceError};
