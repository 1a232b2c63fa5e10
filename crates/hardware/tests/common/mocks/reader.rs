//! Readers that serve some input and then fail.

use std::io::{self, BufRead, Read};

/// Serves `data`, then returns `ErrorKind::BrokenPipe` on every later read.
#[derive(Debug)]
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
}

impl FailingReader {
    /// Creates a reader that fails once `data` is exhausted.
    pub fn new(data: &str) -> Self {
        Self {
            data: data.as_bytes().to_vec(),
            pos: 0,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.data.len() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "trace source went away"));
        }
        Ok(&self.data[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
    }
}
