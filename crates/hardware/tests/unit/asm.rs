//! # Assembler Tests
//!
//! Lexing, pseudo-instruction expansion, label layout, data directives,
//! and line-numbered errors.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rvdb_hardware::asm::expand::{self, split_hi_lo};
use rvdb_hardware::asm::lexer::{Line, lex_line, parse_int, parse_string};
use rvdb_hardware::asm::{SourceRecord, assemble};
use rvdb_hardware::{AsmError, MachineConfig, SimError};

use crate::common::harness::source;

fn assembled(text: &str) -> rvdb_hardware::asm::Program {
    assemble(&source(text), &MachineConfig::default()).unwrap()
}

fn error_of(text: &str) -> (usize, AsmError) {
    match assemble(&source(text), &MachineConfig::default()) {
        Err(SimError::Assemble { line, source }) => (line, source),
        other => panic!("expected an assembly error, got {other:?}"),
    }
}

#[test]
fn test_lex_labels_statement_and_comment() {
    let line = lex_line("start: loop:  ADDI a0, a0, 1 # bump").unwrap();
    assert_eq!(line.labels, vec!["start".to_string(), "loop".to_string()]);
    let stmt = line.statement.unwrap();
    assert_eq!(stmt.head, "addi");
    assert_eq!(stmt.operands, vec!["a0", "a0", "1"]);
    assert_eq!(stmt.text(), "addi a0, a0, 1");
}

#[test]
fn test_lex_blank_and_comment_only() {
    assert_eq!(lex_line("   ").unwrap(), Line::default());
    assert_eq!(lex_line("; nothing here").unwrap(), Line::default());
}

#[test]
fn test_lex_keeps_quoted_separators() {
    let line = lex_line(r#"  .asciz "a, b # c""#).unwrap();
    let stmt = line.statement.unwrap();
    assert!(stmt.is_directive());
    assert_eq!(stmt.operands, vec![r#""a, b # c""#]);
}

#[test]
fn test_lex_unterminated_string() {
    assert!(matches!(
        lex_line(r#".ascii "oops"#),
        Err(AsmError::StringLiteral(_))
    ));
}

#[rstest]
#[case("42", 42)]
#[case("-42", -42)]
#[case("+7", 7)]
#[case("0x1F", 31)]
#[case("0XfF", 255)]
#[case("0b101", 5)]
#[case("'A'", 65)]
#[case(r"'\n'", 10)]
fn test_parse_int(#[case] token: &str, #[case] value: i64) {
    assert_eq!(parse_int(token).unwrap(), value);
}

#[rstest]
#[case("")]
#[case("0x")]
#[case("12ab")]
#[case("'ab'")]
fn test_parse_int_rejects(#[case] token: &str) {
    assert_eq!(
        parse_int(token),
        Err(AsmError::InvalidImmediate(token.to_string()))
    );
}

#[test]
fn test_parse_string_escapes() {
    assert_eq!(parse_string(r#""a\tb\0""#).unwrap(), b"a\tb\0".to_vec());
    assert!(parse_string("noquotes").is_err());
}

#[rstest]
#[case(0x12345, 0x12, 0x345)]
#[case(0x0000_0FFF, 0x1, -1)]
#[case(0xFFFF_F800, 0x0, -2048)]
#[case(0x8000_0000, 0x80000, 0)]
fn test_split_hi_lo(#[case] value: u32, #[case] hi: u32, #[case] lo: i32) {
    assert_eq!(split_hi_lo(value), (hi, lo));
}

proptest! {
    #[test]
    fn prop_split_hi_lo_reconstructs(value: u32) {
        let (hi, lo) = split_hi_lo(value);
        prop_assert!((-2048..=2047).contains(&lo));
        prop_assert_eq!((hi << 12).wrapping_add_signed(lo), value);
    }
}

#[rstest]
#[case("li a0, 5", 1)]
#[case("li a0, -2048", 1)]
#[case("li a0, 2048", 2)]
#[case("li a0, 0x12345", 2)]
#[case("la a0, anywhere", 2)]
#[case("mv a0, a1", 1)]
#[case("ecall", 1)]
fn test_statement_size(#[case] text: &str, #[case] slots: usize) {
    let stmt = lex_line(text).unwrap().statement.unwrap();
    assert_eq!(expand::size(&stmt).unwrap(), slots);
}

#[test]
fn test_unknown_mnemonic_size() {
    let stmt = lex_line("frob a0").unwrap().statement.unwrap();
    assert_eq!(
        expand::size(&stmt),
        Err(AsmError::UnknownMnemonic("frob".to_string()))
    );
}

#[test]
fn test_pseudo_expansion_records_origin() {
    let program = assembled("main:\n  li a0, 0x12345\n  addi a1, a0, 1\n");
    let texts: Vec<&SourceRecord> = program.entries().iter().map(|e| &e.source).collect();
    assert_eq!(
        texts[0],
        &SourceRecord {
            text: "lui a0, 0x12".to_string(),
            origin: Some("li a0, 0x12345".to_string()),
            expansion: Some(0),
            line: 2,
        }
    );
    assert_eq!(texts[1].text, "addi a0, a0, 837");
    assert_eq!(texts[1].expansion, Some(1));
    assert_eq!(texts[2].text, "addi a1, a0, 1");
    assert_eq!(texts[2].origin, None);
    assert_eq!(texts[2].expansion, None);
    assert_eq!(program.label("main"), Some(0x0040_0000));
}

#[test]
fn test_labels_account_for_two_slot_pseudos() {
    let program = assembled(
        "  li t0, 100000\n\
         target:\n\
           j target\n",
    );
    assert_eq!(program.label("target"), Some(0x0040_0008));
    let jump = program.entry_at(0x0040_0008).unwrap();
    assert_eq!(jump.source.text, "jal zero, 0x00400008");
    assert_eq!(program.entries().len(), 3);
}

#[test]
fn test_forward_branch_resolves() {
    let program = assembled("  beqz a0, done\n  addi a0, a0, -1\ndone: ecall\n");
    assert_eq!(
        program.entry_at(0x0040_0000).unwrap().source.text,
        "beq a0, zero, 0x00400008"
    );
}

#[test]
fn test_data_layout_and_word_fixups() {
    let program = assembled(
        ".data\n\
         msg: .asciz \"hi\"\n\
         val: .word 0x12345678, msg\n\
         .text\n\
         la t0, val\n",
    );
    assert_eq!(program.label("msg"), Some(0x1001_0000));
    assert_eq!(program.label("val"), Some(0x1001_0004));
    assert_eq!(
        program.data(),
        &[b'h', b'i', 0, 0, 0x78, 0x56, 0x34, 0x12, 0x00, 0x00, 0x01, 0x10]
    );
    let texts: Vec<&str> = program
        .entries()
        .iter()
        .map(|e| e.source.text.as_str())
        .collect();
    assert_eq!(texts, vec!["lui t0, 0x10010", "addi t0, t0, 4"]);
}

#[test]
fn test_space_and_align() {
    let program = assembled(".data\n.byte 1\n.align 3\nafter: .space 2\n.half -1\n");
    assert_eq!(program.label("after"), Some(0x1001_0008));
    assert_eq!(program.data().len(), 12);
    assert_eq!(&program.data()[10..], &[0xFF, 0xFF]);
}

#[test]
fn test_custom_bases() {
    let config = MachineConfig {
        text_base: 0x1000,
        data_base: 0x2000,
        ..MachineConfig::default()
    };
    let program = assemble(&source(".data\nx: .word 1\n.text\nstart: nop\n"), &config).unwrap();
    assert_eq!(program.label("start"), Some(0x1000));
    assert_eq!(program.label("x"), Some(0x2000));
}

#[test]
fn test_data_segment_may_reach_top_of_memory() {
    let config = MachineConfig {
        data_base: 0xFFFF_FFF0,
        ..MachineConfig::default()
    };
    let program = assemble(&source(".data\nbuf: .space 12\nlast: .word 7\n"), &config).unwrap();
    assert_eq!(program.label("last"), Some(0xFFFF_FFFC));
    assert_eq!(program.data().len(), 16);
}

#[rstest]
#[case(".data\n.space 16\n.byte 1\n", 3, ".byte", 1)]
#[case(".data\n.space 15\n.half 1\n", 3, ".half", 2)]
#[case(".data\n.space 12\n.word 1, 2\n", 3, ".word", 4)]
#[case(".data\n.space 14\n.asciz \"ab\"\n", 3, ".asciz", 3)]
#[case(".data\n.space 17\n", 2, ".space", 17)]
fn test_data_segment_past_top_of_memory(
    #[case] text: &str,
    #[case] line: usize,
    #[case] directive: &str,
    #[case] requested: u64,
) {
    let config = MachineConfig {
        data_base: 0xFFFF_FFF0,
        ..MachineConfig::default()
    };
    match assemble(&source(text), &config) {
        Err(SimError::Assemble { line: at, source }) => {
            assert_eq!(at, line);
            assert_eq!(
                source,
                AsmError::SegmentOverflow {
                    directive: directive.to_string(),
                    requested,
                }
            );
        }
        other => panic!("expected a segment overflow, got {other:?}"),
    }
}

#[rstest]
#[case("nop\nfrob a0\n", 2, AsmError::UnknownMnemonic("frob".into()))]
#[case("j nowhere\n", 1, AsmError::UndefinedLabel("nowhere".into()))]
#[case("a: nop\na: nop\n", 2, AsmError::DuplicateLabel("a".into()))]
#[case(".data\naddi a0, a0, 1\n", 2, AsmError::InstructionInData("addi".into()))]
#[case("addi a0, a0, 4096\n", 1, AsmError::ImmediateOutOfRange { mnemonic: "addi".into(), value: 4096 })]
#[case("add a0, a1\n", 1, AsmError::OperandCount { mnemonic: "add".into(), expected: 3, found: 2 })]
#[case("lw a0, 4[sp]\n", 1, AsmError::MemoryOperand("4[sp]".into()))]
#[case("addi q9, a0, 1\n", 1, AsmError::UnknownRegister("q9".into()))]
#[case(".bogus\n", 1, AsmError::UnknownDirective(".bogus".into()))]
#[case(".data\nbuf: .space 0x7fffffffffffffff\n", 2, AsmError::SegmentOverflow { directive: ".space".into(), requested: 0x7FFF_FFFF_FFFF_FFFF })]
fn test_assembly_errors(#[case] text: &str, #[case] line: usize, #[case] expected: AsmError) {
    assert_eq!(error_of(text), (line, expected));
}

#[test]
fn test_assembly_error_message_names_line() {
    let err = assemble(&source("nop\nnop\nfrob\n"), &MachineConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "line 3: unknown instruction `frob`");
}
