//! Streaming trace reader.
//!
//! Pulls records out of any `BufRead` one line at a time, so traces of any
//! length replay in constant memory. Blank lines are skipped silently; lines
//! that fail to decode are surfaced as recoverable [`TraceError::Malformed`]
//! items and the caller decides whether to continue.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::error::{ParseError, SimError, TraceError};
use crate::trace::record::TraceRecord;

/// Iterator over the records of a trace stream.
///
/// Yields `Ok(record)` for each well-formed line, `Err(TraceError::Malformed)`
/// for each undecodable line, and at most one `Err(TraceError::Io)`, after
/// which it is exhausted.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            failed: false,
        }
    }

    /// 1-based number of the last line read (0 before the first read).
    pub const fn line_number(&self) -> usize {
        self.line
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TraceOpen`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::TraceOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(TraceError::Io(e)));
                }
            }

            let parsed = match std::str::from_utf8(&self.buf) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => text.parse::<TraceRecord>(),
                Err(_) => Err(ParseError::InvalidEncoding),
            };

            return Some(parsed.map_err(|source| TraceError::Malformed {
                line: self.line,
                source,
            }));
        }
    }
}
