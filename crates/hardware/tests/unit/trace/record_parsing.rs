//! # Trace Record Parsing Tests
//!
//! Accepted spellings and rejected lines of the lackey record grammar.

use csim_core::common::ParseError;
use csim_core::trace::{TraceOp, TraceRecord};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("I 0400d7d4,8", TraceOp::Ignore, 0x0400_d7d4, 8)]
#[case(" L 10,1", TraceOp::Load, 0x10, 1)]
#[case(" S 7ff0005c8,8", TraceOp::Store, 0x7_ff00_05c8, 8)]
#[case(" M 0421c7f0,4", TraceOp::Modify, 0x0421_c7f0, 4)]
#[case("L 0x1F,2", TraceOp::Load, 0x1F, 2)]
#[case("L 0XaB,2", TraceOp::Load, 0xAB, 2)]
#[case("\tS  20, 4  ", TraceOp::Store, 0x20, 4)]
#[case("L ffffffffffffffff,1", TraceOp::Load, u64::MAX, 1)]
#[case("L 10,1 extra", TraceOp::Load, 0x10, 1)]
#[case(" S 7ff0005c8,8 \t# comment", TraceOp::Store, 0x7_ff00_05c8, 8)]
fn test_accepts(#[case] line: &str, #[case] op: TraceOp, #[case] address: u64, #[case] size: u32) {
    assert_eq!(line.parse::<TraceRecord>(), Ok(TraceRecord::new(op, address, size)));
}

#[rstest]
#[case("", ParseError::Empty)]
#[case("   ", ParseError::Empty)]
#[case("X 10,1", ParseError::UnknownOp("X".into()))]
#[case("LS 10,1", ParseError::UnknownOp("LS".into()))]
#[case("L", ParseError::MissingAddress)]
#[case("L 10", ParseError::MissingSize("10".into()))]
#[case("L zz,1", ParseError::InvalidAddress("zz".into()))]
#[case("L 0x,1", ParseError::InvalidAddress("0x".into()))]
#[case("L 1ffffffffffffffff,1", ParseError::InvalidAddress("1ffffffffffffffff".into()))]
#[case("L 10,", ParseError::InvalidSize(String::new()))]
#[case("L 10,-1", ParseError::InvalidSize("-1".into()))]
fn test_rejects(#[case] line: &str, #[case] expected: ParseError) {
    assert_eq!(line.parse::<TraceRecord>(), Err(expected));
}

#[test]
fn test_op_access_counts() {
    assert_eq!(TraceOp::Ignore.accesses(), 0);
    assert_eq!(TraceOp::Load.accesses(), 1);
    assert_eq!(TraceOp::Store.accesses(), 1);
    assert_eq!(TraceOp::Modify.accesses(), 2);
}

#[test]
fn test_op_char_conversions() {
    for op in [TraceOp::Ignore, TraceOp::Load, TraceOp::Store, TraceOp::Modify] {
        assert_eq!(TraceOp::try_from(op.as_char()), Ok(op));
    }
    assert_eq!("".parse::<TraceOp>(), Err(ParseError::Empty));
}

#[rstest]
#[case(" M 0421c7f0,4", "M 0421c7f0,4")]
#[case("I 0400d7d4,8", "I 0400d7d4,8")]
#[case(" L 10,1", "L 10,1")]
#[case(" M 0x00AB,4", "M 00ab,4")]
#[case("S 0,1 trailing", "S 0,1")]
fn test_display_keeps_written_digits(#[case] line: &str, #[case] expected: &str) {
    let record: TraceRecord = line.parse().unwrap();
    assert_eq!(record.to_string(), expected);
}

#[test]
fn test_built_record_displays_unpadded() {
    let record = TraceRecord::new(TraceOp::Modify, 0x0421_c7f0, 4);
    assert_eq!(record.address_width(), 0);
    assert_eq!(record.to_string(), "M 421c7f0,4");
}

#[test]
fn test_equality_ignores_written_width() {
    let padded: TraceRecord = "L 0010,1".parse().unwrap();
    let plain: TraceRecord = "L 10,1".parse().unwrap();
    assert_eq!(padded.address_width(), 4);
    assert_eq!(padded, plain);
}
