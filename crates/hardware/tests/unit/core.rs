//! # Core Tests
//!
//! Register file and RV32IM ALU semantics.

use proptest::prelude::*;
use rstest::rstest;
use rvdb_hardware::core::arch::Gpr;
use rvdb_hardware::core::units::alu::Alu;
use rvdb_hardware::isa::AluOp;

const NEG1: u32 = u32::MAX;
const I32_MIN: u32 = 0x8000_0000;

#[test]
fn test_gpr_new_initializes_to_zero() {
    let gpr = Gpr::new();
    for i in 0..32 {
        assert_eq!(gpr.read(i), 0);
    }
}

#[test]
fn test_gpr_x0_ignores_writes() {
    let mut gpr = Gpr::new();
    gpr.write(0, 0xDEAD_BEEF);
    assert_eq!(gpr.read(0), 0);
}

#[test]
fn test_gpr_write_all_registers() {
    let mut gpr = Gpr::new();
    for i in 1..32 {
        let value = 0x0101_0101 * i as u32;
        gpr.write(i, value);
        assert_eq!(gpr.read(i), value);
    }
}

#[test]
fn test_gpr_out_of_range_is_inert() {
    let mut gpr = Gpr::new();
    gpr.write(32, 7);
    assert_eq!(gpr.read(32), 0);
}

#[rstest]
#[case::add_wraps(AluOp::Add, NEG1, 1, 0)]
#[case::sub_wraps(AluOp::Sub, 0, 1, NEG1)]
#[case::mul_low(AluOp::Mul, 0x1_0001, 0x1_0001, 0x0002_0001)]
#[case::mulh_signed(AluOp::Mulh, NEG1, NEG1, 0)]
#[case::mulh_min(AluOp::Mulh, I32_MIN, I32_MIN, 0x4000_0000)]
#[case::mulhu(AluOp::Mulhu, NEG1, NEG1, 0xFFFF_FFFE)]
#[case::div_truncates(AluOp::Div, -7_i32 as u32, 2, -3_i32 as u32)]
#[case::div_by_zero(AluOp::Div, 5, 0, NEG1)]
#[case::div_overflow(AluOp::Div, I32_MIN, NEG1, I32_MIN)]
#[case::divu_by_zero(AluOp::Divu, 5, 0, NEG1)]
#[case::rem_sign_of_dividend(AluOp::Rem, -7_i32 as u32, 2, NEG1)]
#[case::rem_by_zero(AluOp::Rem, 9, 0, 9)]
#[case::rem_overflow(AluOp::Rem, I32_MIN, NEG1, 0)]
#[case::remu_by_zero(AluOp::Remu, 9, 0, 9)]
#[case::slt_signed(AluOp::Slt, NEG1, 0, 1)]
#[case::sltu_unsigned(AluOp::Sltu, NEG1, 0, 0)]
#[case::xor(AluOp::Xor, 0xF0F0, 0xFF00, 0x0FF0)]
#[case::or(AluOp::Or, 0xF0, 0x0F, 0xFF)]
#[case::and(AluOp::And, 0xF0, 0x3C, 0x30)]
#[case::sll_masks_amount(AluOp::Sll, 1, 33, 2)]
#[case::srl_logical(AluOp::Srl, I32_MIN, 31, 1)]
#[case::sra_arithmetic(AluOp::Sra, I32_MIN, 31, NEG1)]
fn test_alu(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(Alu::execute(op, a, b), expected);
}

proptest! {
    #[test]
    fn prop_add_sub_inverse(a: u32, b: u32) {
        let sum = Alu::execute(AluOp::Add, a, b);
        prop_assert_eq!(Alu::execute(AluOp::Sub, sum, b), a);
    }

    #[test]
    fn prop_divu_remu_reconstruct(a: u32, b in 1u32..) {
        let q = Alu::execute(AluOp::Divu, a, b);
        let r = Alu::execute(AluOp::Remu, a, b);
        prop_assert_eq!(q.wrapping_mul(b).wrapping_add(r), a);
    }
}
