//! # ISA Tests
//!
//! Register naming and canonical instruction text.

use rstest::rstest;
use rvdb_hardware::Reg;
use rvdb_hardware::isa::abi::{parse_register, reg_name};
use rvdb_hardware::isa::{AluOp, BranchCond, Instruction, LoadWidth, StoreWidth};

#[rstest]
#[case("zero", 0)]
#[case("x0", 0)]
#[case("ra", 1)]
#[case("sp", 2)]
#[case("fp", 8)]
#[case("s0", 8)]
#[case("a0", 10)]
#[case("$a7", 17)]
#[case("t6", 31)]
#[case("x31", 31)]
fn test_parse_register(#[case] token: &str, #[case] idx: usize) {
    assert_eq!(parse_register(token), Some(idx));
}

#[rstest]
#[case("x32")]
#[case("a8")]
#[case("pc")]
#[case("")]
fn test_parse_register_rejects(#[case] token: &str) {
    assert_eq!(parse_register(token), None);
}

#[test]
fn test_reg_name_round_trip() {
    for idx in 0..32 {
        assert_eq!(parse_register(reg_name(idx)), Some(idx));
    }
}

#[test]
fn test_reg_all_order() {
    let names: Vec<&str> = Reg::all().map(Reg::name).collect();
    assert_eq!(names.len(), 33);
    assert_eq!(names[0], "zero");
    assert_eq!(names[2], "sp");
    assert_eq!(names[32], "pc");
    assert_eq!(Reg::from_name("pc"), Some(Reg::Pc));
    assert_eq!(Reg::from_name("a0"), Some(Reg::Gpr(10)));
}

#[rstest]
#[case(Instruction::OpImm { op: AluOp::Add, rd: 10, rs1: 0, imm: 5 }, "addi a0, zero, 5")]
#[case(Instruction::OpImm { op: AluOp::Sra, rd: 5, rs1: 5, imm: 3 }, "srai t0, t0, 3")]
#[case(Instruction::Op { op: AluOp::Mul, rd: 10, rs1: 11, rs2: 12 }, "mul a0, a1, a2")]
#[case(Instruction::Lui { rd: 10, imm: 0x12 }, "lui a0, 0x12")]
#[case(Instruction::Jal { rd: 1, target: 0x0040_0010 }, "jal ra, 0x00400010")]
#[case(Instruction::Jalr { rd: 0, rs1: 1, offset: 0 }, "jalr zero, 0(ra)")]
#[case(Instruction::Branch { cond: BranchCond::Ne, rs1: 5, rs2: 0, target: 0x0040_0000 }, "bne t0, zero, 0x00400000")]
#[case(Instruction::Load { width: LoadWidth::Word, rd: 5, rs1: 2, offset: 4 }, "lw t0, 4(sp)")]
#[case(Instruction::Store { width: StoreWidth::Byte, rs1: 2, rs2: 5, offset: -1 }, "sb t0, -1(sp)")]
#[case(Instruction::Ecall, "ecall")]
fn test_instruction_display(#[case] inst: Instruction, #[case] text: &str) {
    assert_eq!(inst.to_string(), text);
}
