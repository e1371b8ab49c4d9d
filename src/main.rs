// src/main.rs
use anyhow::Result;
use s2020::lexer::chartab::{build_scheme_table, pack_scheme_table, scheme::cc};

fn class_name(class: u8) -> &'static str {
    match class {
        cc::WHITESPACE_CLASS => "white",
        cc::INITIAL_CLASS => "initial",
        cc::PECULIAR_IDENT_CLASS => "peculiar",
        cc::DIGIT_CLASS => "digit",
        cc::UTF8_CLASS => "utf8",
        _ => "-",
    }
}

fn main() -> Result<()> {
    // A tiny sample covering identifiers, numbers, peculiar identifiers and delimiters.
    let src = "(define (f x) (+ x 1.5)) ; λ";

    let packed = pack_scheme_table(&build_scheme_table()?)?;

    println!("BYTES:");
    for &b in src.as_bytes() {
        let shown = if b.is_ascii_graphic() {
            format!("'{}'", b as char)
        } else {
            format!("0x{b:02x}")
        };
        println!(
            "{shown:>6}  {:<8}  sub={} sign={} dot={} delim={}",
            class_name(packed.class_of(b)),
            packed.is_subsequent(b) as u8,
            packed.is_sign_subsequent(b) as u8,
            packed.is_dot_subsequent(b) as u8,
            packed.is_delimiter(b) as u8,
        );
    }
    Ok(())
}
