//! Address decomposition.
//!
//! This module splits a 64-bit memory address into the three fields a
//! set-associative cache cares about. It provides the following:
//! 1. **Tag:** The high-order bits left after removing the set index and block offset.
//! 2. **Set Index:** The `s` bits immediately above the block offset.
//! 3. **Block Offset:** The low `b` bits; decoded but never used by the functional model.
//!
//! Addresses are plain `u64` values. Shifts go through `checked_shr` so a layout
//! whose index and offset together cover the whole address never panics.

/// Field layout of an address for a given cache geometry.
///
/// Built from the set-index and block-offset bit counts of a
/// [`CacheConfig`](crate::config::CacheConfig). All methods are pure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressLayout {
    set_index_bits: u32,
    block_offset_bits: u32,
}

/// An address split into its cache-relevant fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddr {
    /// Remaining high-order bits identifying the block.
    pub tag: u64,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset inside the block.
    pub block_offset: u64,
}

/// Returns a mask with the low `bits` bits set, saturating at 64.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressLayout {
    /// Creates a layout with `set_index_bits` index bits above `block_offset_bits` offset bits.
    pub const fn new(set_index_bits: u32, block_offset_bits: u32) -> Self {
        Self {
            set_index_bits,
            block_offset_bits,
        }
    }

    /// Number of set index bits (`s`).
    #[inline(always)]
    pub const fn set_index_bits(&self) -> u32 {
        self.set_index_bits
    }

    /// Number of block offset bits (`b`).
    #[inline(always)]
    pub const fn block_offset_bits(&self) -> u32 {
        self.block_offset_bits
    }

    /// Width of the tag field in bits (`64 - s - b`, zero when the other fields fill the address).
    pub const fn tag_bits(&self) -> u32 {
        u64::BITS.saturating_sub(self.set_index_bits.saturating_add(self.block_offset_bits))
    }

    /// Extracts the tag: `addr >> (s + b)`.
    ///
    /// Returns zero when `s + b` is 64 or more.
    #[inline(always)]
    pub const fn tag(&self, addr: u64) -> u64 {
        match addr.checked_shr(self.set_index_bits.saturating_add(self.block_offset_bits)) {
            Some(tag) => tag,
            None => 0,
        }
    }

    /// Extracts the set index: `(addr >> b) & (2^s - 1)`.
    #[inline(always)]
    pub const fn set_index(&self, addr: u64) -> usize {
        let shifted = match addr.checked_shr(self.block_offset_bits) {
            Some(v) => v,
            None => 0,
        };
        (shifted & low_mask(self.set_index_bits)) as usize
    }

    /// Extracts the block offset: `addr & (2^b - 1)`.
    #[inline(always)]
    pub const fn block_offset(&self, addr: u64) -> u64 {
        addr & low_mask(self.block_offset_bits)
    }

    /// Splits `addr` into tag, set index and block offset.
    pub const fn decompose(&self, addr: u64) -> DecodedAddr {
        DecodedAddr {
            tag: self.tag(addr),
            set_index: self.set_index(addr),
            block_offset: self.block_offset(addr),
        }
    }

    /// Rebuilds the base address of the block identified by `tag` and `set_index`.
    ///
    /// Inverse of [`decompose`](Self::decompose) with a zero block offset; used
    /// to report which block a line holds.
    pub const fn block_base(&self, tag: u64, set_index: usize) -> u64 {
        let offset_bits = self.block_offset_bits;
        let index = (set_index as u64) & low_mask(self.set_index_bits);
        let index_part = match index.checked_shl(offset_bits) {
            Some(v) => v,
            None => 0,
        };
        let tag_part = match tag.checked_shl(self.set_index_bits.saturating_add(offset_bits)) {
            Some(v) => v,
            None => 0,
        };
        tag_part | index_part
    }
}
