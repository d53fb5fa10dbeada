use arch::op::Format;

use crate::diag::{DiagKind, Diags};
use crate::label::{Labels, Segment};
use crate::parser::{self, Directive, Kind, Line, Width};

/// The code segment starts here; the data segment follows it immediately.
pub const CODE_BASE: u32 = 100;

/// An allocated instruction awaiting encoding. `bits` is written exactly
/// once, by pass two.
#[derive(Debug, Clone)]
pub struct PendingInst {
    pub addr: u32,
    pub raw: String,
    pub format: Format,
    pub bits: Option<u32>,
}

/// One allocated data item of the data image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataItem {
    pub addr: u32,
    pub value: i32,
    pub width: Width,
}

/// Everything pass one produces for a single translation unit.
#[derive(Debug)]
pub struct Unit {
    pub labels: Labels,
    pub insts: Vec<PendingInst>,
    pub data: Vec<DataItem>,
    pub diags: Diags,
    /// Final value of the instruction counter (absolute end of code).
    pub icf: u32,
    /// Final end of the data segment once rebased after the code.
    pub dcf: u32,
}

/// Walk the source twice: sub-scan A assigns addresses, builds the symbol
/// table and materializes the pending instruction and data lists; sub-scan B
/// processes `.extern`/`.entry`. Finalization rebases every data-segment
/// symbol past the code.
pub fn pass1(lines: &[Line]) -> Unit {
    let mut labels = Labels::new();
    let mut insts: Vec<PendingInst> = vec![];
    let mut data: Vec<DataItem> = vec![];
    let mut diags = Diags::new();
    let mut ic = CODE_BASE;
    let mut dc: u32 = 0;

    // Sub-scan A.
    for line in lines {
        if line.over_length() {
            diags.push(line.no(), DiagKind::LineTooLong);
            continue;
        }
        match parser::classify(line.raw()) {
            Kind::Blank | Kind::Comment | Kind::Invalid => {}
            Kind::Inst(op) => {
                define_label(&mut labels, &mut diags, line, ic, Segment::Code);
                insts.push(PendingInst {
                    addr: ic,
                    raw: line.raw().to_string(),
                    format: op.format(),
                    bits: None,
                });
                ic += 4;
            }
            Kind::Directive(dir) => {
                // A label lands in the data segment before the directive
                // name is inspected, `.entry`/`.extern` included.
                define_label(&mut labels, &mut diags, line, dc, Segment::Data);
                let params = parser::split(line.raw()).params.unwrap_or("").trim();
                match dir {
                    Directive::Entry | Directive::Extern => {}
                    Directive::Asciz => {
                        if let Some(inner) = params
                            .strip_prefix('"')
                            .and_then(|s| s.strip_suffix('"'))
                        {
                            for byte in inner.bytes() {
                                data.push(DataItem {
                                    addr: dc,
                                    value: byte as i32,
                                    width: Width::Byte,
                                });
                                dc += 1;
                            }
                            // Terminator byte, part of the string's width.
                            data.push(DataItem {
                                addr: dc,
                                value: 0,
                                width: Width::Byte,
                            });
                            dc += 1;
                        }
                    }
                    Directive::Db | Directive::Dh | Directive::Dw => {
                        let width = match dir {
                            Directive::Dh => Width::Half,
                            Directive::Dw => Width::Word,
                            _ => Width::Byte,
                        };
                        if !params.is_empty() {
                            for field in params.split(',') {
                                // Unparseable fields allocate as zero; the
                                // validator rejects the line before output.
                                let value = field.trim().parse::<i64>().unwrap_or(0) as i32;
                                data.push(DataItem {
                                    addr: dc,
                                    value,
                                    width,
                                });
                                dc += width.bytes();
                            }
                        }
                    }
                }
            }
        }
    }

    // Sub-scan B: external declarations and entry marks, now that every
    // local definition is known.
    for line in lines {
        if line.over_length() {
            continue;
        }
        let Kind::Directive(dir) = parser::classify(line.raw()) else {
            continue;
        };
        let name = parser::split(line.raw()).params.unwrap_or("").trim();
        match dir {
            Directive::Extern => {
                if name.is_empty() {
                    continue;
                }
                if !labels.declare_external(name) {
                    diags.push(line.no(), DiagKind::ExternAndInternal(name.to_string()));
                }
            }
            Directive::Entry => labels.mark_entry(name),
            _ => {}
        }
    }

    // Finalization: data-segment symbols become absolute.
    labels.shift_data(ic);

    Unit {
        labels,
        insts,
        data,
        diags,
        icf: ic,
        dcf: ic + dc,
    }
}

/// Rebase the data image itself; called only once encoding is going ahead.
pub fn shift_data_image(data: &mut [DataItem], icf: u32) {
    for item in data {
        item.addr += icf;
    }
}

fn define_label(labels: &mut Labels, diags: &mut Diags, line: &Line, value: u32, segment: Segment) {
    let parts = parser::split(line.raw());
    if let Some(label) = parts.label {
        if !label.is_empty() && !labels.define(label, value, segment) {
            diags.push(line.no(), DiagKind::Redefined(label.to_string()));
        }
    }
}
