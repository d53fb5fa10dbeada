use arch::inst::Inst;
use arch::op::{Family, Op};
use arch::reg::Reg;

use crate::error::Error;
use crate::label::Labels;
use crate::parser;
use crate::pass1::PendingInst;

/// Encode every pending instruction against the finalized symbol table.
/// Runs only after the validator reported zero diagnostics; any failure in
/// here is an internal-consistency fault, not a user diagnostic.
pub fn pass2(insts: &mut [PendingInst], labels: &Labels) -> Result<(), Error> {
    for pending in insts.iter_mut() {
        let inst = resolve(pending, labels)?;
        pending.bits = Some(inst.encode());
    }
    Ok(())
}

/// Recover mnemonic and operands from the stored line text and resolve them
/// into a concrete instruction.
pub fn resolve(pending: &PendingInst, labels: &Labels) -> Result<Inst, Error> {
    let parts = parser::split(&pending.raw);
    let name = parts.name.unwrap_or_default();
    let op = Op::parse(name).map_err(|_| Error::UnknownOperation(name.to_string()))?;
    let params = parts.params.unwrap_or("");
    let fields: Vec<&str> = params.split(',').map(str::trim).collect();

    match op.family() {
        Family::RArith => Ok(Inst::R {
            op,
            rs: reg(&fields, 0)?,
            rt: reg(&fields, 1)?,
            rd: reg(&fields, 2)?,
        }),
        Family::RMove => Ok(Inst::R {
            op,
            rs: reg(&fields, 0)?,
            rt: Reg::R0,
            rd: reg(&fields, 1)?,
        }),
        Family::IArith => {
            let rs = reg(&fields, 0)?;
            let lit = field(&fields, 1)?;
            let imm = lit
                .parse::<i64>()
                .map_err(|_| Error::ParseArgument(lit.to_string(), "immediate".to_string()))?
                as i16;
            let rt = reg(&fields, 2)?;
            Ok(Inst::I { op, rs, rt, imm })
        }
        Family::IBranch => {
            let rs = reg(&fields, 0)?;
            let rt = reg(&fields, 1)?;
            let target = field(&fields, 2)?;
            let addr = labels
                .lookup(target)
                .ok_or_else(|| Error::UndefinedLabel(target.to_string()))?;
            // The displacement is stored as a magnitude: this format cannot
            // tell a backward branch from a forward one.
            let imm = pending.addr.abs_diff(addr) as i16;
            Ok(Inst::I { op, rs, rt, imm })
        }
        Family::Jump | Family::Call => {
            let target = field(&fields, 0)?;
            match Reg::parse(target) {
                Ok(r) => Ok(Inst::J {
                    op,
                    reg: true,
                    addr: r.index() as u32,
                }),
                Err(_) => {
                    let addr = labels
                        .lookup(target)
                        .ok_or_else(|| Error::UndefinedLabel(target.to_string()))?;
                    Ok(Inst::J {
                        op,
                        reg: false,
                        addr,
                    })
                }
            }
        }
        Family::Stop => Ok(Inst::J {
            op,
            reg: false,
            addr: 0,
        }),
    }
}

/// Recompute every external symbol's use sites from the target operand of
/// the jump, call and branch instructions, in first-discovered order.
pub fn collect_extern_uses(insts: &[PendingInst], labels: &mut Labels) {
    let externs: Vec<String> = labels
        .iter()
        .filter(|(_, label)| label.is_external)
        .map(|(name, _)| name.clone())
        .collect();

    for name in externs {
        for pending in insts {
            let parts = parser::split(&pending.raw);
            let Some(op) = parts.name.and_then(|n| Op::parse(n).ok()) else {
                continue;
            };
            let fields: Vec<&str> = parts
                .params
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .collect();
            let target = match op.family() {
                Family::Jump | Family::Call => fields.first().copied(),
                Family::IBranch => fields.get(2).copied(),
                _ => None,
            };
            if target == Some(name.as_str()) {
                labels.record_use(&name, pending.addr);
            }
        }
    }
}

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, Error> {
    fields.get(index).copied().ok_or(Error::MissingArgument)
}

fn reg(fields: &[&str], index: usize) -> Result<Reg, Error> {
    let s = field(fields, index)?;
    Reg::parse(s).map_err(|_| Error::ParseArgument(s.to_string(), "register".to_string()))
}
