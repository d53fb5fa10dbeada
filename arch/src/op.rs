use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The three instruction formats of the RM32 ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    R,
    I,
    J,
}

/// Operand shape of a mnemonic. Each family fixes the arity and the
/// per-position operand kinds the assembler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// `op $rs, $rt, $rd`
    RArith,
    /// `op $rs, $rd`
    RMove,
    /// `op $rs, imm, $rt`
    IArith,
    /// `op $rs, $rt, label`
    IBranch,
    /// `op $reg` or `op label`
    Jump,
    /// `op label`
    Call,
    /// no operands
    Stop,
}

impl Family {
    pub fn arity(self) -> usize {
        match self {
            Family::RArith | Family::IArith | Family::IBranch => 3,
            Family::RMove => 2,
            Family::Jump | Family::Call => 1,
            Family::Stop => 0,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Op {
    ADD,
    SUB,
    AND,
    OR,
    NOR,
    MOVE,
    MVHI,
    MVLO,
    ADDI,
    SUBI,
    ANDI,
    ORI,
    NORI,
    BNE,
    BEQ,
    BLT,
    BGT,
    LB,
    SB,
    LW,
    SW,
    LH,
    SH,
    JMP,
    LA,
    CALL,
    STOP,
}

impl Op {
    /// Mnemonic lookup is case sensitive: `ADD` is a legal label name.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        use Op::*;
        match self {
            ADD | SUB | AND | OR | NOR => 0,
            MOVE | MVHI | MVLO => 1,
            ADDI => 10,
            SUBI => 11,
            ANDI => 12,
            ORI => 13,
            NORI => 14,
            BNE => 15,
            BEQ => 16,
            BLT => 17,
            BGT => 18,
            LB => 19,
            SB => 20,
            LW => 21,
            SW => 22,
            LH => 23,
            SH => 24,
            JMP => 30,
            LA => 31,
            CALL => 32,
            STOP => 63,
        }
    }

    /// Funct field of the R format; zero outside it.
    pub fn funct(self) -> u8 {
        use Op::*;
        match self {
            ADD | MOVE => 1,
            SUB | MVHI => 2,
            AND | MVLO => 3,
            OR => 4,
            NOR => 5,
            _ => 0,
        }
    }

    pub fn format(self) -> Format {
        use Op::*;
        match self {
            ADD | SUB | AND | OR | NOR | MOVE | MVHI | MVLO => Format::R,
            ADDI | SUBI | ANDI | ORI | NORI | BNE | BEQ | BLT | BGT | LB | SB | LW | SW | LH
            | SH => Format::I,
            JMP | LA | CALL | STOP => Format::J,
        }
    }

    pub fn family(self) -> Family {
        use Op::*;
        match self {
            ADD | SUB | AND | OR | NOR => Family::RArith,
            MOVE | MVHI | MVLO => Family::RMove,
            ADDI | SUBI | ANDI | ORI | NORI | LB | SB | LW | SW | LH | SH => Family::IArith,
            BNE | BEQ | BLT | BGT => Family::IBranch,
            JMP => Family::Jump,
            LA | CALL => Family::Call,
            STOP => Family::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Op::parse("add"), Ok(Op::ADD));
        assert_eq!(Op::parse("stop"), Ok(Op::STOP));
        assert!(Op::parse("ADD").is_err());
        assert!(Op::parse("hoge").is_err());
    }

    #[test]
    fn tables() {
        assert_eq!(Op::ADD.code(), 0);
        assert_eq!(Op::ADD.funct(), 1);
        assert_eq!(Op::NOR.funct(), 5);
        assert_eq!(Op::MVLO.code(), 1);
        assert_eq!(Op::MVLO.funct(), 3);
        assert_eq!(Op::ADDI.code(), 10);
        assert_eq!(Op::SH.code(), 24);
        assert_eq!(Op::JMP.code(), 30);
        assert_eq!(Op::STOP.code(), 63);
    }

    #[test]
    fn families() {
        assert_eq!(Op::ADD.family(), Family::RArith);
        assert_eq!(Op::MOVE.family().arity(), 2);
        assert_eq!(Op::SW.family(), Family::IArith);
        assert_eq!(Op::BGT.family(), Family::IBranch);
        assert_eq!(Op::LA.family(), Family::Call);
        assert_eq!(Op::STOP.family().arity(), 0);
        assert_eq!(Op::BNE.format(), Format::I);
    }
}
