//! Memory access traces.
//!
//! This module turns trace text into records for the dispatcher:
//! 1. **Record Model:** Operation kinds and the decoded `(op, address, size)` record.
//! 2. **Parsing:** `FromStr` for single lines, with typed errors for each way a line can be malformed.
//! 3. **Streaming:** A line-numbered reader over any buffered byte stream.

/// Trace operations, records and the line parser.
pub mod record;

/// Line-by-line trace reader.
pub mod reader;

pub use reader::TraceReader;
pub use record::{TraceOp, TraceRecord};
