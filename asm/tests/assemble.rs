use rmasm::parser::Line;
use rmasm::pass1::{self, Unit};
use rmasm::{encode, files, validate};

/// Run the full pipeline over an in-memory source, exactly as the driver
/// does: pass 1, independent validation, then encoding when clean.
fn assemble(src: &str) -> Unit {
    let lines: Vec<Line> = src
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::new(idx, raw))
        .collect();

    let mut unit = pass1::pass1(&lines);
    for line in &lines {
        if line.over_length() {
            continue;
        }
        if let Err(kind) = validate::check_line(line.raw(), &unit.labels) {
            unit.diags.push(line.no(), kind);
        }
    }
    if unit.diags.is_empty() {
        pass1::shift_data_image(&mut unit.data, unit.icf);
        encode::pass2(&mut unit.insts, &unit.labels).unwrap();
        encode::collect_extern_uses(&unit.insts, &mut unit.labels);
    }
    unit
}

const SAMPLE: &str = "\
; sample translation unit
MAIN:   add $3, $5, $9
        la K
LOOP:   jmp L1
STR:    .asciz \"ab\"
L1:     sw $9, 34, $2
        bgt $4, $2, END
K:      .dw 31, -12
        call EXTFN
END:    stop
        .extern EXTFN
        .entry MAIN
        .entry LOOP
";

#[test]
fn sample_unit_is_clean() {
    let unit = assemble(SAMPLE);
    let kinds: Vec<String> = unit.diags.iter().map(|d| format!("{:?}", d)).collect();
    assert!(unit.diags.is_empty(), "unexpected diagnostics: {kinds:?}");
}

#[test]
fn sample_layout() {
    let unit = assemble(SAMPLE);

    // Seven instructions from base 100, so the code segment ends at 128.
    let addrs: Vec<u32> = unit.insts.iter().map(|i| i.addr).collect();
    assert_eq!(addrs, vec![100, 104, 108, 112, 116, 120, 124]);
    assert_eq!(unit.icf, 128);

    // Data: "ab\0" then two words; labels rebased to follow the code.
    assert_eq!(unit.labels.lookup("STR"), Some(128));
    assert_eq!(unit.labels.lookup("K"), Some(131));
    assert_eq!(unit.dcf, 139);
    assert_eq!(unit.data.first().map(|d| d.addr), Some(128));

    // Code labels keep their pass-one addresses.
    assert_eq!(unit.labels.lookup("MAIN"), Some(100));
    assert_eq!(unit.labels.lookup("LOOP"), Some(108));
    assert_eq!(unit.labels.lookup("END"), Some(124));
}

#[test]
fn sample_encodings() {
    let unit = assemble(SAMPLE);
    let words: Vec<u32> = unit.insts.iter().map(|i| i.bits.unwrap()).collect();

    // add $3,$5,$9: opcode 0, rs 3, rt 5, rd 9, funct 1.
    assert_eq!(words[0], 3 << 21 | 5 << 16 | 9 << 11 | 1 << 6);
    // la K: label form, absolute address 131.
    assert_eq!(words[1], 31 << 26 | 131);
    // jmp L1: absolute address 112.
    assert_eq!(words[2], 30 << 26 | 112);
    // sw $9, 34, $2.
    assert_eq!(words[3], 22 << 26 | 9 << 21 | 2 << 16 | 34);
    // bgt $4,$2,END at 116: |124 - 116| = 8.
    assert_eq!(words[4], 18 << 26 | 4 << 21 | 2 << 16 | 8);
    // call EXTFN: external resolves to address 0.
    assert_eq!(words[5], 32 << 26);
    // stop.
    assert_eq!(words[6], 63 << 26);
}

#[test]
fn sample_exports() {
    let unit = assemble(SAMPLE);

    let ext = unit.labels.get("EXTFN").unwrap();
    assert!(ext.is_external);
    assert_eq!(ext.uses, vec![120]);

    assert_eq!(files::entry_text(&unit.labels), "MAIN 0100 \nLOOP 0108 \n");
    assert_eq!(files::extern_text(&unit.labels), "EXTFN 0120 \n");
}

#[test]
fn object_text_round_trip() {
    let unit = assemble(SAMPLE);
    let text = files::object_text(&unit.insts, &unit.data, unit.icf, unit.dcf);

    // Header: code length 28, data length 11.
    assert_eq!(text.lines().next(), Some("\t \t 28 11 "));

    // First instruction row carries the add word, LSB first.
    let word = unit.insts[0].bits.unwrap();
    let b = word.to_le_bytes();
    let expected = format!("0100 {:02X} {:02X} {:02X} {:02X} ", b[0], b[1], b[2], b[3]);
    assert_eq!(text.lines().nth(1), Some(expected.as_str()));

    // The data image starts right after the last instruction row.
    assert!(text.lines().nth(8).unwrap().starts_with("0128 "));
}

#[test]
fn diagnostics_gate_encoding() {
    let unit = assemble("add $1,$2\nstop");
    assert_eq!(unit.diags.len(), 1);
    assert!(unit.insts.iter().all(|i| i.bits.is_none()));
    // Data image was never rebased either.
    assert!(unit.data.is_empty());
}

#[test]
fn one_diagnostic_per_offending_line() {
    // Three independent bad lines surface three diagnostics in one run.
    let unit = assemble("add $1,,$2\n.db 999\nbeq $1,$2,NOWHERE");
    assert_eq!(unit.diags.len(), 3);
}

#[test]
fn extern_of_local_label_is_rejected() {
    let unit = assemble("X: .db 1\n.extern X");
    assert_eq!(unit.diags.len(), 1);

    let reversed = assemble(".extern X\nX: .db 1");
    assert_eq!(reversed.diags.len(), 1);
}
