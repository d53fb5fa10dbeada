use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::label::Labels;
use crate::pass1::{DataItem, PendingInst, CODE_BASE};

/// Render the object image: a header with the two segment lengths, one row
/// per instruction word, then the data image packed four bytes per row.
/// Every word is written least significant byte first.
pub fn object_text(insts: &[PendingInst], data: &[DataItem], icf: u32, dcf: u32) -> String {
    let mut out = String::new();
    out.push_str(&format!("\t \t {} {} \n", icf - CODE_BASE, dcf - icf));

    for pending in insts {
        if let Some(word) = pending.bits {
            let b = word.to_le_bytes();
            out.push_str(&format!(
                "{:04} {:02X} {:02X} {:02X} {:02X} \n",
                pending.addr, b[0], b[1], b[2], b[3]
            ));
        }
    }

    let mut col = 0;
    let mut row_addr = data.first().map(|item| item.addr).unwrap_or(0);
    for item in data {
        let le = (item.value as u32).to_le_bytes();
        for byte in &le[..item.width as usize] {
            if col == 0 {
                out.push_str(&format!("{row_addr:04} "));
                row_addr += 4;
            }
            out.push_str(&format!("{byte:02X} "));
            col += 1;
            if col == 4 {
                out.push('\n');
                col = 0;
            }
        }
    }
    out
}

pub fn write_object(
    path: &Path,
    insts: &[PendingInst],
    data: &[DataItem],
    icf: u32,
    dcf: u32,
) -> Result<(), Error> {
    write(path.with_extension("ob"), object_text(insts, data, icf, dcf))
}

/// One `name address` record per entry symbol, in table order. The file is
/// not created when nothing is flagged entry.
pub fn entry_text(labels: &Labels) -> String {
    let mut out = String::new();
    for (name, label) in labels.iter() {
        if label.is_entry {
            out.push_str(&format!("{} {:04} \n", name, label.value));
        }
    }
    out
}

pub fn write_entries(path: &Path, labels: &Labels) -> Result<(), Error> {
    let out = entry_text(labels);
    if out.is_empty() {
        return Ok(());
    }
    write(path.with_extension("ent"), out)
}

/// One `name address` record per recorded use of each external symbol, in
/// first-discovered order. Skipped entirely when no use was recorded.
pub fn extern_text(labels: &Labels) -> String {
    let mut out = String::new();
    for (name, label) in labels.iter() {
        if label.is_external {
            for addr in &label.uses {
                out.push_str(&format!("{} {:04} \n", name, addr));
            }
        }
    }
    out
}

pub fn write_externals(path: &Path, labels: &Labels) -> Result<(), Error> {
    let out = extern_text(labels);
    if out.is_empty() {
        return Ok(());
    }
    write(path.with_extension("ext"), out)
}

fn write(path: std::path::PathBuf, text: String) -> Result<(), Error> {
    fs::write(&path, text).map_err(|e| Error::FileWrite(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Segment;
    use crate::parser::Width;
    use arch::op::Format;

    fn inst(addr: u32, bits: u32) -> PendingInst {
        PendingInst {
            addr,
            raw: String::new(),
            format: Format::R,
            bits: Some(bits),
        }
    }

    #[test]
    fn object_header_holds_segment_lengths() {
        let text = object_text(&[], &[], 108, 113);
        assert_eq!(text.lines().next(), Some("\t \t 8 5 "));
    }

    #[test]
    fn instruction_rows_are_lsb_first() {
        let text = object_text(&[inst(100, 0x0022_1840)], &[], 104, 104);
        assert_eq!(text.lines().nth(1), Some("0100 40 18 22 00 "));
    }

    #[test]
    fn data_rows_pack_four_bytes() {
        let data = vec![
            DataItem { addr: 104, value: 6, width: Width::Byte },
            DataItem { addr: 105, value: -2, width: Width::Byte },
            DataItem { addr: 106, value: 257, width: Width::Half },
            DataItem { addr: 108, value: 5, width: Width::Byte },
        ];
        let text = object_text(&[], &data, 104, 109);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        // Half words stream low byte first; rows advance by four.
        assert_eq!(rows, vec!["0104 06 FE 01 01 ", "0108 05 "]);
    }

    #[test]
    fn partial_data_row_is_unterminated() {
        let data = vec![DataItem { addr: 104, value: 1, width: Width::Byte }];
        let text = object_text(&[], &data, 104, 105);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn entry_and_extern_records() {
        let mut labels = Labels::new();
        labels.define("MAIN", 100, Segment::Code);
        labels.mark_entry("MAIN");
        labels.declare_external("EXT");
        labels.record_use("EXT", 104);
        labels.record_use("EXT", 112);

        assert_eq!(entry_text(&labels), "MAIN 0100 \n");
        assert_eq!(extern_text(&labels), "EXT 0104 \nEXT 0112 \n");
    }

    #[test]
    fn no_records_no_text() {
        let labels = Labels::new();
        assert!(entry_text(&labels).is_empty());
        assert!(extern_text(&labels).is_empty());
    }
}
