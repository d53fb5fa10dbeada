use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The 32 general purpose registers, written `$0`..`$31` in source.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Reg {
    #[default]
    #[strum(serialize = "$0")]
    R0,
    #[strum(serialize = "$1")]
    R1,
    #[strum(serialize = "$2")]
    R2,
    #[strum(serialize = "$3")]
    R3,
    #[strum(serialize = "$4")]
    R4,
    #[strum(serialize = "$5")]
    R5,
    #[strum(serialize = "$6")]
    R6,
    #[strum(serialize = "$7")]
    R7,
    #[strum(serialize = "$8")]
    R8,
    #[strum(serialize = "$9")]
    R9,
    #[strum(serialize = "$10")]
    R10,
    #[strum(serialize = "$11")]
    R11,
    #[strum(serialize = "$12")]
    R12,
    #[strum(serialize = "$13")]
    R13,
    #[strum(serialize = "$14")]
    R14,
    #[strum(serialize = "$15")]
    R15,
    #[strum(serialize = "$16")]
    R16,
    #[strum(serialize = "$17")]
    R17,
    #[strum(serialize = "$18")]
    R18,
    #[strum(serialize = "$19")]
    R19,
    #[strum(serialize = "$20")]
    R20,
    #[strum(serialize = "$21")]
    R21,
    #[strum(serialize = "$22")]
    R22,
    #[strum(serialize = "$23")]
    R23,
    #[strum(serialize = "$24")]
    R24,
    #[strum(serialize = "$25")]
    R25,
    #[strum(serialize = "$26")]
    R26,
    #[strum(serialize = "$27")]
    R27,
    #[strum(serialize = "$28")]
    R28,
    #[strum(serialize = "$29")]
    R29,
    #[strum(serialize = "$30")]
    R30,
    #[strum(serialize = "$31")]
    R31,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn index(self) -> u8 {
        self.into()
    }
}
