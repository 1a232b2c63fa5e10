//! Trace record model and line parser.
//!
//! Traces use the Valgrind `lackey` memory-trace format, one access per line:
//!
//! ```text
//! I 0400d7d4,8
//!  L 7ff0005b8,8
//!  S 7ff0005c8,8
//!  M 0421c7f0,4
//! ```
//!
//! The operation is one of `I` (instruction fetch), `L` (load), `S` (store) or
//! `M` (modify, a load followed by a store). The address is hexadecimal with an
//! optional `0x` prefix; the size is a decimal byte count that the functional
//! model carries but does not use.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::common::error::ParseError;

/// Kind of memory operation in a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceOp {
    /// Instruction fetch; does not touch the data cache.
    Ignore,
    /// Data load.
    Load,
    /// Data store.
    Store,
    /// Data modify: a load immediately followed by a store to the same address.
    Modify,
}

impl TraceOp {
    /// Number of cache accesses this operation performs.
    pub const fn accesses(self) -> u64 {
        match self {
            Self::Ignore => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }

    /// Trace-format character for this operation.
    pub const fn as_char(self) -> char {
        match self {
            Self::Ignore => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }
}

impl TryFrom<char> for TraceOp {
    type Error = ParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'I' => Ok(Self::Ignore),
            'L' => Ok(Self::Load),
            'S' => Ok(Self::Store),
            'M' => Ok(Self::Modify),
            other => Err(ParseError::UnknownOp(other.to_string())),
        }
    }
}

impl FromStr for TraceOp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            (None, _) => Err(ParseError::Empty),
            _ => Err(ParseError::UnknownOp(s.to_owned())),
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One decoded trace line.
///
/// Equality and hashing cover the access only (`op`, `address`, `size`); the
/// hex digit count kept for display does not take part.
#[derive(Clone, Copy, Debug)]
pub struct TraceRecord {
    /// Operation kind.
    pub op: TraceOp,
    /// Accessed address.
    pub address: u64,
    /// Access size in bytes (unused by the functional model).
    pub size: u32,
    /// Number of hex digits the address was written with.
    address_width: u8,
}

impl TraceRecord {
    /// Creates a record whose address displays without zero padding.
    pub const fn new(op: TraceOp, address: u64, size: u32) -> Self {
        Self {
            op,
            address,
            size,
            address_width: 0,
        }
    }

    /// Number of hex digits the address was written with (0 if built directly).
    pub const fn address_width(&self) -> usize {
        self.address_width as usize
    }
}

impl PartialEq for TraceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.address == other.address && self.size == other.size
    }
}

impl Eq for TraceRecord {}

impl Hash for TraceRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.hash(state);
        self.address.hash(state);
        self.size.hash(state);
    }
}

/// Parses a hexadecimal address with an optional `0x`/`0X` prefix.
///
/// Returns the address and the number of hex digits it was written with.
fn parse_address(token: &str) -> Result<(u64, u8), ParseError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidAddress(token.to_owned()));
    }
    let address = u64::from_str_radix(digits, 16)
        .map_err(|_| ParseError::InvalidAddress(token.to_owned()))?;
    Ok((address, u8::try_from(digits.len()).unwrap_or(u8::MAX)))
}

/// Parses a decimal access size.
fn parse_size(token: &str) -> Result<u32, ParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidSize(token.to_owned()));
    }
    token
        .parse()
        .map_err(|_| ParseError::InvalidSize(token.to_owned()))
}

impl FromStr for TraceRecord {
    type Err = ParseError;

    /// Parses `<op> <hex-address>,<size>`, tolerating surrounding whitespace
    /// and whitespace after the comma. Whitespace-separated tokens after the
    /// size are ignored.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (op_token, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(op, rest)| (op, rest.trim_start()));
        let op = op_token.parse::<TraceOp>()?;
        if rest.is_empty() {
            return Err(ParseError::MissingAddress);
        }

        let (addr_token, size_rest) = rest
            .split_once(',')
            .ok_or_else(|| ParseError::MissingSize(rest.to_owned()))?;
        let (address, address_width) = parse_address(addr_token)?;

        let size_token = size_rest
            .split_whitespace()
            .next()
            .unwrap_or_default();
        let size = parse_size(size_token)?;

        Ok(Self {
            op,
            address,
            size,
            address_width,
        })
    }
}

impl fmt::Display for TraceRecord {
    /// Formats the record as `L 10,1`: lowercase hex, no prefix, zero-padded
    /// to the digit count the address was parsed with (`M 0421c7f0,4`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:0width$x},{}",
            self.op,
            self.address,
            self.size,
            width = self.address_width()
        )
    }
}
