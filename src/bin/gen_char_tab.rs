// src/bin/gen_char_tab.rs
// Build the s2020 lexer's character-class table once and write it out.
// Usage:
//   cargo run --bin gen_char_tab                       # CharTab.inc text on stdout
//   cargo run --bin gen_char_tab -- lib/Parser/CharTab.inc
//   cargo run --bin gen_char_tab -- tables/chartab.json    # packed flags, JSON
//   cargo run --bin gen_char_tab -- tables/chartab.bin     # packed flags, binary

use std::{
    env, fs,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, bail};
use s2020::lexer::chartab::{
    build_scheme_table, pack_scheme_table, save_packed_bin, save_packed_json, write_char_tab,
};

fn main() -> Result<()> {
    eprintln!("[gen_char_tab] building scheme char table…");
    let table = build_scheme_table()?;

    let Some(out) = env::args().nth(1) else {
        let stdout = io::stdout();
        write_char_tab(&mut stdout.lock(), &table).context("writing table to stdout")?;
        return Ok(());
    };
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    match out_path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let packed = pack_scheme_table(&table)?;
            save_packed_json(out_path, &packed)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }
        Some("bin") => {
            let packed = pack_scheme_table(&table)?;
            save_packed_bin(out_path, &packed)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }
        Some("inc") | Some("h") | None => {
            let f = fs::File::create(out_path)
                .with_context(|| format!("failed to create {}", out_path.display()))?;
            write_char_tab(&mut BufWriter::new(f), &table)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }
        Some(other) => bail!("unknown output extension `.{other}` (expected .inc, .json or .bin)"),
    }

    eprintln!("[gen_char_tab] wrote {}", out_path.display());
    Ok(())
}
