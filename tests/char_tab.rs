//! End-to-end tests for the char-class table generator.

use s2020::lexer::chartab::{
    CategoryModel, Flag, FlagEncoding, Rule, TableError, TagDecl, apply_rules,
    build_scheme_table, emit_line, generate_char_tab, pack, pack_scheme_table, render_char_tab,
    scheme_model, scheme_rules,
};

const GOLDEN: &str = include_str!("golden/CharTab.inc");

#[test]
fn scheme_table_matches_golden_inc() {
    let text = generate_char_tab().expect("scheme rules are valid");
    for (i, (got, want)) in text.lines().zip(GOLDEN.lines()).enumerate() {
        assert_eq!(got, want, "line for byte {i} differs");
    }
    assert_eq!(text, GOLDEN);
}

#[test]
fn output_has_256_lines_in_byte_order() {
    let text = generate_char_tab().unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 256);
    for (i, line) in lines.iter().enumerate() {
        let prefix = format!("  /* {i:3}, ");
        assert!(line.starts_with(&prefix), "line {i}: {line}");
        assert!(line.ends_with(','), "line {i}: {line}");
    }
}

#[test]
fn initial_scenario() {
    let model = CategoryModel::new(&[TagDecl::atomic("INITIAL", "CC::InitialClass")]).unwrap();
    let rules = [
        Rule::range("INITIAL", 'a', 'z'),
        Rule::range("INITIAL", 'A', 'Z'),
        Rule::points(
            "INITIAL",
            [
                '!', '$', '%', '&', '*', '/', ':', '<', '=', '>', '?', '^', '_', '~', '@',
            ],
        ),
    ];
    let text = render_char_tab(&apply_rules(&model, &rules).unwrap());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[97], "  /*  97, 'a'  */ CC::InitialClass,");
    assert_eq!(lines[0], "  /*   0, 0x00 */ 0,");
    assert!(lines[0].contains("0x00"));
    assert!(lines[0].ends_with(" 0,"));
    assert_eq!(lines[b'#' as usize], "  /*  35, '#'  */ 0,");
    assert_eq!(lines[b'@' as usize], "  /*  64, '@'  */ CC::InitialClass,");
}

#[test]
fn every_scheme_rule_order_gives_the_same_table() {
    let model = scheme_model().unwrap();
    let mut rules = scheme_rules();
    let forward = apply_rules(&model, &rules).unwrap();
    rules.reverse();
    let backward = apply_rules(&model, &rules).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(render_char_tab(&forward), render_char_tab(&backward));
}

#[test]
fn bad_rule_aborts_without_output() {
    let model = scheme_model().unwrap();
    let mut rules = scheme_rules();
    rules.push(Rule::points("NOT_A_TAG", ['x']));
    let err = apply_rules(&model, &rules).unwrap_err();
    assert_eq!(err.root(), &TableError::UnknownTag("NOT_A_TAG".into()));
    assert!(err.to_string().contains("NOT_A_TAG @ {'x'}"));
}

#[test]
fn packed_table_agrees_with_tag_table() {
    let table = build_scheme_table().unwrap();
    let packed = pack_scheme_table(&table).unwrap();
    for b in 0u8..=255 {
        assert_eq!(
            packed.flags(b) == 0,
            table.entry(b).is_empty(),
            "byte {b}"
        );
        assert_eq!(packed.is_delimiter(b), table.has_symbol(b, "CC::Delimiter"));
        assert_eq!(packed.is_subsequent(b), table.has_symbol(b, "CC::Subsequent"));
    }
}

#[test]
fn aliased_symbol_is_one_tag() {
    let model = CategoryModel::new(&[
        TagDecl::atomic("A", "CC::X"),
        TagDecl::atomic("B", "CC::X"),
    ])
    .unwrap();
    let rules = [Rule::points("A", ['q']), Rule::points("B", ['q'])];
    let table = apply_rules(&model, &rules).unwrap();

    assert_eq!(table.entry(b'q').len(), 1);
    assert_eq!(emit_line(&table, b'q'), "  /* 113, 'q'  */ CC::X,");

    let encoding = FlagEncoding::new(7, &[("CC::X", Flag::Class(1))]).unwrap();
    let packed = pack(&table, &encoding).expect("one class per byte");
    assert_eq!(packed.class_of(b'q'), 1);
}
