use std::cmp::Ordering;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use arch::op::{Family, Op};
use arch::reg::Reg;

use crate::diag::DiagKind;
use crate::label::Labels;
use crate::parser::{self, Directive, Kind};

/// Names a label may never take: every register, mnemonic and directive.
static RESERVED: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut set: HashSet<String> = (0..32).map(|i| format!("${i}")).collect();
    set.extend(Op::iter().map(|op| op.to_string()));
    set.extend(Directive::iter().map(|dir| dir.to_string()));
    set
});

/// Check one source line against the grammar and semantic rules, consulting
/// the fully populated symbol table. Pure: never mutates anything. The first
/// violated rule determines the reported kind.
pub fn check_line(code: &str, labels: &Labels) -> Result<(), DiagKind> {
    let kind = parser::classify(code);
    if matches!(kind, Kind::Blank | Kind::Comment) {
        return Ok(());
    }
    if code.trim_start().starts_with(':') {
        return Err(DiagKind::EmptyLabel);
    }
    match kind {
        Kind::Inst(op) => check_inst(code, op, labels),
        Kind::Directive(dir) => check_directive(code, dir, labels),
        Kind::Invalid => check_invalid(code),
        Kind::Blank | Kind::Comment => Ok(()),
    }
}

fn check_inst(code: &str, op: Op, labels: &Labels) -> Result<(), DiagKind> {
    let parts = parser::split(code);
    check_label(parts.label)?;

    let params = parts.params.unwrap_or("");
    if !params.is_empty() {
        check_commas(params)?;
    }

    let fields = split_fields(params);
    check_arity(fields.len(), op.family())?;
    check_operands(&fields, op.family(), labels)
}

fn check_directive(code: &str, dir: Directive, labels: &Labels) -> Result<(), DiagKind> {
    let parts = parser::split(code);
    check_label(parts.label)?;

    let params = parts.params.unwrap_or("").trim();
    match dir {
        Directive::Asciz => check_asciz(params),
        Directive::Entry | Directive::Extern => {
            let fields = split_fields(params);
            if fields.len() != 1 {
                return Err(DiagKind::ParamCount);
            }
            if !labels.exists(fields[0]) {
                return Err(DiagKind::LabelDoesntExist);
            }
            Ok(())
        }
        Directive::Db | Directive::Dh | Directive::Dw => {
            if params.is_empty() {
                return Err(DiagKind::MissingParam);
            }
            check_commas(params)?;
            for field in params.split(',') {
                check_data_value(field.trim(), dir)?;
            }
            Ok(())
        }
    }
}

/// Lines the classifier could not place: a bare label, an unknown directive
/// or an unknown mnemonic. The label syntax rule still fires first.
fn check_invalid(code: &str) -> Result<(), DiagKind> {
    let parts = parser::split(code);
    check_label(parts.label)?;
    match parts.name {
        None if parts.label.is_some() => Err(DiagKind::LabelOnInvalidLine),
        Some(name) if name.starts_with('.') => Err(DiagKind::DirectiveName),
        _ => Err(DiagKind::CommandName),
    }
}

// ----------------------------------------------------------------------------
// Label syntax

fn check_label(label: Option<&str>) -> Result<(), DiagKind> {
    let Some(label) = label else {
        return Ok(());
    };
    if label.len() > 31 {
        return Err(DiagKind::LabelSyntax);
    }
    let mut chars = label.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(DiagKind::LabelSyntax);
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(DiagKind::LabelSyntax);
    }
    if RESERVED.contains(label) {
        return Err(DiagKind::LabelSyntax);
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Comma discipline and arity

fn check_commas(params: &str) -> Result<(), DiagKind> {
    for field in params.split(',') {
        let field = field.trim();
        if field.is_empty() {
            return Err(DiagKind::MultipleCommas);
        }
        if field.chars().any(char::is_whitespace) {
            return Err(DiagKind::MissingComma);
        }
    }
    Ok(())
}

fn split_fields(params: &str) -> Vec<&str> {
    if params.trim().is_empty() {
        vec![]
    } else {
        params.split(',').map(str::trim).collect()
    }
}

fn check_arity(count: usize, family: Family) -> Result<(), DiagKind> {
    match count.cmp(&family.arity()) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(DiagKind::MissingParam),
        Ordering::Greater => Err(DiagKind::ExtraneousParam),
    }
}

// ----------------------------------------------------------------------------
// Per-operand checks by family

fn check_operands(fields: &[&str], family: Family, labels: &Labels) -> Result<(), DiagKind> {
    match family {
        Family::RArith | Family::RMove => {
            if fields.iter().all(|field| is_register(field)) {
                Ok(())
            } else {
                Err(DiagKind::RegisterName)
            }
        }
        Family::IArith => {
            if !is_register(fields[0]) || !is_register(fields[2]) {
                return Err(DiagKind::RegisterName);
            }
            check_immediate(fields[1])
        }
        Family::IBranch => {
            if !is_register(fields[0]) || !is_register(fields[1]) {
                return Err(DiagKind::RegisterName);
            }
            if !labels.exists(fields[2]) {
                return Err(DiagKind::LabelDoesntExist);
            }
            Ok(())
        }
        Family::Jump => {
            if is_register(fields[0]) || labels.exists(fields[0]) {
                Ok(())
            } else {
                Err(DiagKind::WrongParameters)
            }
        }
        Family::Call => {
            if labels.exists(fields[0]) {
                Ok(())
            } else {
                Err(DiagKind::LabelDoesntExist)
            }
        }
        Family::Stop => Ok(()),
    }
}

fn is_register(field: &str) -> bool {
    Reg::parse(field).is_ok()
}

fn check_immediate(field: &str) -> Result<(), DiagKind> {
    let value: i64 = field.parse().map_err(|_| DiagKind::WrongParameters)?;
    if (-32768..=32767).contains(&value) {
        Ok(())
    } else {
        Err(DiagKind::ValueOutOfRange)
    }
}

// ----------------------------------------------------------------------------
// Directive parameters

fn check_asciz(params: &str) -> Result<(), DiagKind> {
    if params.is_empty() {
        return Err(DiagKind::ParamCount);
    }
    let inner = params
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(DiagKind::MissingQuotes)?;
    if inner.chars().all(|c| (' '..='~').contains(&c)) {
        Ok(())
    } else {
        Err(DiagKind::NotPrintable)
    }
}

fn check_data_value(field: &str, dir: Directive) -> Result<(), DiagKind> {
    let value: i64 = field.parse().map_err(|_| DiagKind::WrongParameters)?;
    let in_range = match dir {
        Directive::Db => (-128..=127).contains(&value),
        Directive::Dh => (-32768..=32767).contains(&value),
        Directive::Dw => (i32::MIN as i64..=i32::MAX as i64).contains(&value),
        _ => false,
    };
    if in_range {
        Ok(())
    } else {
        Err(DiagKind::ValueOutOfRange)
    }
}
