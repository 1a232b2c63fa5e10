//! # Address Decomposition Tests
//!
//! Checks the tag / set index / block offset split for typical and degenerate
//! layouts.

use csim_core::common::{AddressLayout, DecodedAddr};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(4, 4, 0x10, 0, 1, 0)]
#[case(4, 4, 0x20, 0, 2, 0)]
#[case(4, 4, 0x110, 1, 1, 0)]
#[case(4, 4, 0x12, 0, 1, 2)]
#[case(1, 1, 0b111, 1, 1, 1)]
#[case(2, 3, 0xFFFF, 0xFFFF >> 5, 3, 7)]
fn test_decompose_fields(
    #[case] s: u32,
    #[case] b: u32,
    #[case] addr: u64,
    #[case] tag: u64,
    #[case] set_index: usize,
    #[case] block_offset: u64,
) {
    let layout = AddressLayout::new(s, b);
    assert_eq!(
        layout.decompose(addr),
        DecodedAddr {
            tag,
            set_index,
            block_offset
        }
    );
}

#[test]
fn test_zero_set_bits_always_index_zero() {
    let layout = AddressLayout::new(0, 4);
    for addr in [0u64, 0x10, 0xFFFF_FFFF, u64::MAX] {
        assert_eq!(layout.set_index(addr), 0);
        assert_eq!(layout.tag(addr), addr >> 4);
    }
}

#[test]
fn test_zero_offset_bits_every_byte_is_a_block() {
    let layout = AddressLayout::new(2, 0);
    assert_eq!(layout.block_offset(0x7), 0);
    assert_eq!(layout.set_index(0x7), 3);
    assert_eq!(layout.tag(0x7), 1);
}

#[test]
fn test_tag_width() {
    assert_eq!(AddressLayout::new(4, 4).tag_bits(), 56);
    assert_eq!(AddressLayout::new(0, 0).tag_bits(), 64);
    assert_eq!(AddressLayout::new(32, 32).tag_bits(), 0);
}

#[test]
fn test_full_width_fields_give_zero_tag() {
    let layout = AddressLayout::new(32, 32);
    assert_eq!(layout.tag(u64::MAX), 0);
    assert_eq!(layout.set_index(u64::MAX), 0xFFFF_FFFF);
    assert_eq!(layout.block_offset(u64::MAX), 0xFFFF_FFFF);
}

#[test]
fn test_decomposition_is_pure() {
    let layout = AddressLayout::new(5, 3);
    let first = layout.decompose(0xDEAD_BEEF);
    let second = layout.decompose(0xDEAD_BEEF);
    assert_eq!(first, second);
}

#[test]
fn test_block_base_clears_offset() {
    let layout = AddressLayout::new(4, 4);
    let d = layout.decompose(0x1234_5678);
    assert_eq!(layout.block_base(d.tag, d.set_index), 0x1234_5670);
}
