// src/lexer/chartab/emit.rs
// Renders a CharTable as the body of a `static const CC::Flags s_charTab[256]` initializer:
//
//   /*  97, 'a'  */ CC::DotSubsequent | CC::InitialClass | CC::SignSubsequent | CC::Subsequent,
//   /* 128, 0x80 */ CC::UTF8Class,

use std::io::{self, Write};

use super::CharTable;

/// Printable ASCII is shown as a char literal; everything else as hex.
fn annotation(byte: u8) -> String {
    if (32..=126).contains(&byte) {
        format!("'{}' ", byte as char)
    } else {
        format!("0x{byte:02x}")
    }
}

/// One initializer line for `byte`, without the trailing newline.
pub fn emit_line(table: &CharTable, byte: u8) -> String {
    let syms = table.sorted_symbols(byte);
    let expr = if syms.is_empty() {
        "0".to_string()
    } else {
        syms.join(" | ")
    };
    format!("  /* {byte:3}, {} */ {expr},", annotation(byte))
}

/// Stream all 256 lines in ascending byte order.
pub fn write_char_tab<W: Write>(w: &mut W, table: &CharTable) -> io::Result<()> {
    for (b, _) in table.iter() {
        writeln!(w, "{}", emit_line(table, b))?;
    }
    w.flush()
}

pub fn render_char_tab(table: &CharTable) -> String {
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::chartab::{CategoryModel, TableBuilder, TagDecl};

    fn model() -> CategoryModel {
        CategoryModel::new(&[
            TagDecl::atomic("SUB", "CC::Subsequent"),
            TagDecl::atomic("DIGIT", "CC::DigitClass"),
            TagDecl::atomic("DELIM", "CC::Delimiter"),
        ])
        .unwrap()
    }

    #[test]
    fn annotations() {
        assert_eq!(annotation(0), "0x00");
        assert_eq!(annotation(31), "0x1f");
        assert_eq!(annotation(32), "' ' ");
        assert_eq!(annotation(b'\''), "''' ");
        assert_eq!(annotation(b'\\'), "'\\' ");
        assert_eq!(annotation(126), "'~' ");
        assert_eq!(annotation(127), "0x7f");
        assert_eq!(annotation(255), "0xff");
    }

    #[test]
    fn symbols_are_sorted_regardless_of_insertion_order() {
        let m = model();
        let mut b = TableBuilder::new(&m);
        b.apply_tag("SUB", '0').unwrap();
        b.apply_tag("DIGIT", '0').unwrap();
        let t = b.finish();
        assert_eq!(
            emit_line(&t, b'0'),
            "  /*  48, '0'  */ CC::DigitClass | CC::Subsequent,"
        );
    }

    #[test]
    fn empty_entry_emits_zero() {
        let t = TableBuilder::new(&model()).finish();
        assert_eq!(emit_line(&t, 0), "  /*   0, 0x00 */ 0,");
        assert_eq!(emit_line(&t, 200), "  /* 200, 0xc8 */ 0,");
    }

    #[test]
    fn writer_and_string_agree() {
        let m = model();
        let mut b = TableBuilder::new(&m);
        b.apply_points("DELIM", ['(', ')']).unwrap();
        let t = b.finish();

        let mut buf = Vec::new();
        write_char_tab(&mut buf, &t).unwrap();
        let text = render_char_tab(&t);
        assert_eq!(String::from_utf8(buf).unwrap(), text);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 256);
        assert_eq!(lines[40], "  /*  40, '('  */ CC::Delimiter,");
    }
}
