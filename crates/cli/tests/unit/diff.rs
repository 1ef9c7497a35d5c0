//! # Trace Rendering Tests
//!
//! Exact text of register diffs, memory diffs, register dumps, and code lines.

use proptest::prelude::*;
use rstest::rstest;
use rvdb::diff;
use rvdb_hardware::{ChangeRecord, SourceRecord};

#[test]
fn test_register_change() {
    let change = ChangeRecord {
        key: "R".to_string(),
        previous: 0,
        current: 1,
    };
    assert_eq!(diff::register_change(&change), "$R: 0x00000000 -> 0x00000001");
}

#[test]
fn test_memory_change_zero_extends_address() {
    let change = ChangeRecord {
        key: 0x1000_u32,
        previous: 0x00_u8,
        current: 0xFF,
    };
    assert_eq!(diff::memory_change(&change), "0x00001000: 0x00 -> 0xFF");
}

#[rstest]
#[case(0, "0x00000000")]
#[case(0xABC, "0x00000ABC")]
#[case(u32::MAX, "0xFFFFFFFF")]
fn test_word(#[case] value: u32, #[case] text: &str) {
    assert_eq!(diff::word(value), text);
}

#[rstest]
#[case(0, "0x00")]
#[case(0x0A, "0x0A")]
#[case(0xFF, "0xFF")]
fn test_byte(#[case] value: u8, #[case] text: &str) {
    assert_eq!(diff::byte(value), text);
}

#[test]
fn test_register_value() {
    assert_eq!(diff::register_value("sp", 0x7FFF_EFFC), "$sp: 0x7FFFEFFC");
}

#[test]
fn test_code_plain() {
    let source = SourceRecord {
        text: "addi a0, zero, 1".to_string(),
        origin: None,
        expansion: None,
        line: 3,
    };
    assert_eq!(
        diff::code(0x0040_0000, Some(&source)),
        "0x00400000: addi a0, zero, 1"
    );
}

#[test]
fn test_code_pseudo() {
    let source = SourceRecord {
        text: "lui a0, 0x12".to_string(),
        origin: Some("li a0, 0x12345".to_string()),
        expansion: Some(0),
        line: 4,
    };
    assert_eq!(
        diff::code(0x0040_0004, Some(&source)),
        "0x00400004: lui a0, 0x12 (li a0, 0x12345 #0)"
    );
}

#[test]
fn test_code_end_of_program() {
    assert_eq!(diff::code(0x0040_0010, None), "0x00400010: <end of program>");
}

proptest! {
    #[test]
    fn prop_word_is_fixed_width_and_exact(value: u32) {
        let text = diff::word(value);
        prop_assert_eq!(text.len(), 10);
        prop_assert_eq!(u32::from_str_radix(&text[2..], 16).unwrap(), value);
        prop_assert_eq!(text[2..].to_ascii_uppercase(), text[2..].to_string());
    }

    #[test]
    fn prop_memory_change_layout(addr: u32, previous: u8, current: u8) {
        let text = diff::memory_change(&ChangeRecord { key: addr, previous, current });
        prop_assert_eq!(text.len(), "0x00000000: 0x00 -> 0x00".len());
        let expected_prefix = format!("{}: ", diff::word(addr));
        prop_assert!(text.starts_with(&expected_prefix));
    }
}
