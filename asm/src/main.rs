use std::io::BufRead;
use std::path::Path;

use color_print::cprintln;

use rmasm::error::Error;
use rmasm::parser::Line;
use rmasm::pass1::Unit;
use rmasm::{encode, files, pass1, validate};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    #[clap(default_value = "main.as")]
    input: Vec<String>,

    /// Dump the resolved layout
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("RM32 Assembler");

    let mut failed = false;
    for path in &args.input {
        if let Err(err) = run(path, args.dump) {
            cprintln!("<red,bold>error</>: {}", err);
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
}

/// Assemble one translation unit start to finish. All state is local to the
/// call and dropped before the next file is considered.
fn run(path: &str, dump: bool) -> Result<(), Error> {
    if !path.ends_with(".as") {
        return Err(Error::NotAsmFile(path.to_string()));
    }

    println!("  < {}", path);
    let file = std::fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    let mut lines = vec![];
    for (idx, raw) in std::io::BufReader::new(file).lines().enumerate() {
        let raw = raw.map_err(Error::FileRead)?;
        lines.push(Line::new(idx, &raw));
    }

    // Pass 1: addresses, symbol table, pending images.
    let mut unit = pass1::pass1(&lines);

    // Independent validation pass over the fully populated table.
    for line in &lines {
        if line.over_length() {
            continue;
        }
        if let Err(kind) = validate::check_line(line.raw(), &unit.labels) {
            unit.diags.push(line.no(), kind);
        }
    }

    if !unit.diags.is_empty() {
        unit.diags.print(path, &lines);
        cprintln!(
            "<red,bold>{} error(s)</>, no output generated for {}",
            unit.diags.len(),
            path
        );
        return Ok(());
    }

    // Pass 2: encode against the final addresses.
    pass1::shift_data_image(&mut unit.data, unit.icf);
    encode::pass2(&mut unit.insts, &unit.labels)?;
    encode::collect_extern_uses(&unit.insts, &mut unit.labels);

    let out = Path::new(path);
    files::write_object(out, &unit.insts, &unit.data, unit.icf, unit.dcf)?;
    files::write_entries(out, &unit.labels)?;
    files::write_externals(out, &unit.labels)?;
    println!("  > {}", out.with_extension("ob").display());

    if dump {
        print_dump(&unit);
    }
    Ok(())
}

fn print_dump(unit: &Unit) {
    println!("------+-------------+----------------------------------");
    for pending in &unit.insts {
        if let (Some(word), Ok(inst)) = (pending.bits, encode::resolve(pending, &unit.labels)) {
            let b = word.to_le_bytes();
            cprintln!(
                " <green>{:04}</> | {:02X} {:02X} {:02X} {:02X} | {}",
                pending.addr,
                b[0],
                b[1],
                b[2],
                b[3],
                inst.cformat()
            );
        }
    }
    for item in &unit.data {
        cprintln!(
            " <green>{:04}</> | <yellow>{:<11}</> | {:?}",
            item.addr,
            item.value,
            item.width
        );
    }
    println!("------+-------------+----------------------------------");
}
