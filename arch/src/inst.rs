use crate::{op::Op, reg::Reg};

use color_print::cformat;

/// A fully resolved instruction, ready for bit packing.
///
/// Field layout, most significant bit first:
/// - R: opcode(6) rs(5) rt(5) rd(5) funct(5) unused(6)
/// - I: opcode(6) rs(5) rt(5) immed(16, signed)
/// - J: opcode(6) reg(1) address(25)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    R { op: Op, rs: Reg, rt: Reg, rd: Reg },
    I { op: Op, rs: Reg, rt: Reg, imm: i16 },
    J { op: Op, reg: bool, addr: u32 },
}

impl Inst {
    pub fn encode(self) -> u32 {
        match self {
            Inst::R { op, rs, rt, rd } => {
                (op.code() as u32) << 26
                    | (rs.index() as u32) << 21
                    | (rt.index() as u32) << 16
                    | (rd.index() as u32) << 11
                    | (op.funct() as u32) << 6
            }
            Inst::I { op, rs, rt, imm } => {
                (op.code() as u32) << 26
                    | (rs.index() as u32) << 21
                    | (rt.index() as u32) << 16
                    | (imm as u16 as u32)
            }
            Inst::J { op, reg, addr } => {
                (op.code() as u32) << 26 | (reg as u32) << 25 | (addr & 0x01FF_FFFF)
            }
        }
    }

    /// Byte order handed to the object writer: least significant first.
    pub fn bytes(self) -> [u8; 4] {
        self.encode().to_le_bytes()
    }

    pub fn cformat(self) -> String {
        match self {
            Inst::R { op, rs, rt, rd } => {
                cformat!("<red>{:<6}</><blue>{:<4} {:<4} {:<4}</>", op, rs, rt, rd)
            }
            Inst::I { op, rs, rt, imm } => cformat!(
                "<red>{:<6}</><blue>{:<4} {:<4}</> <yellow>{}</>",
                op,
                rs,
                rt,
                imm
            ),
            Inst::J { op, reg: true, addr } => {
                cformat!("<red>{:<6}</><blue>${}</>", op, addr)
            }
            Inst::J { op, reg: false, addr } => {
                cformat!("<red>{:<6}</><green>{:04}</>", op, addr)
            }
        }
    }
}
