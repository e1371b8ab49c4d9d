// src/lexer/chartab/scheme.rs
// Character classes of the s2020 Scheme lexer.

use std::time::Instant;

use anyhow::{Context, Result};

use super::{
    CategoryModel, CharTable, Flag, FlagEncoding, PackedCharTab, Rule, TableError, TagDecl,
    apply_rules, pack, render_char_tab,
};

/// Flag values as the lexer's `CC` enum declares them.
pub mod cc {
    pub const CLASS_MASK: u8 = 7;

    pub const WHITESPACE_CLASS: u8 = 1;
    /// Initial identifier.
    pub const INITIAL_CLASS: u8 = 2;
    /// `+`, `-`, `.`
    pub const PECULIAR_IDENT_CLASS: u8 = 3;
    pub const DIGIT_CLASS: u8 = 4;
    pub const UTF8_CLASS: u8 = 5;

    /// Subsequent identifier.
    pub const SUBSEQUENT: u8 = 1 << 3;
    pub const SIGN_SUBSEQUENT: u8 = 2 << 3;
    pub const DOT_SUBSEQUENT: u8 = 4 << 3;
    pub const DELIMITER: u8 = 8 << 3;
}

const IDENT_SPECIALS: [char; 14] = [
    '!', '$', '%', '&', '*', '/', ':', '<', '=', '>', '?', '^', '_', '~',
];

pub fn scheme_model() -> Result<CategoryModel, TableError> {
    CategoryModel::new(&[
        TagDecl::atomic("SUBSEQUENT", "CC::Subsequent"),
        TagDecl::atomic("DELIMITER", "CC::Delimiter"),
        TagDecl::atomic("WHITESPACE_CLASS", "CC::WhitespaceClass"),
        TagDecl::composite("WHITESPACE", &["WHITESPACE_CLASS", "DELIMITER"]),
        TagDecl::atomic("UTF8", "CC::UTF8Class"),
        TagDecl::atomic("PECULIAR_IDENT", "CC::PeculiarIdentClass"),
        TagDecl::atomic("DOT_SUBSEQUENT", "CC::DotSubsequent"),
        TagDecl::atomic("SIGN_SUBSEQUENT_FLAG", "CC::SignSubsequent"),
        TagDecl::composite("SIGN_SUBSEQUENT", &["SIGN_SUBSEQUENT_FLAG", "DOT_SUBSEQUENT"]),
        TagDecl::atomic("INITIAL_CLASS", "CC::InitialClass"),
        TagDecl::composite("INITIAL", &["INITIAL_CLASS", "SIGN_SUBSEQUENT"]),
        TagDecl::atomic("DIGIT", "CC::DigitClass"),
    ])
}

pub fn scheme_rules() -> Vec<Rule> {
    vec![
        Rule::range("INITIAL", 'a', 'z'),
        Rule::range("INITIAL", 'A', 'Z'),
        Rule::points("INITIAL", IDENT_SPECIALS.iter().copied().chain(['@'])),
        Rule::range("SUBSEQUENT", 'a', 'z'),
        Rule::range("SUBSEQUENT", 'A', 'Z'),
        Rule::points("SUBSEQUENT", IDENT_SPECIALS),
        Rule::range("SUBSEQUENT", '0', '9'),
        Rule::points("SUBSEQUENT", ['+', '-', '.', '@']),
        Rule::points("WHITESPACE", [' ', '\n', '\r', '\x0b', '\t']),
        Rule::points("PECULIAR_IDENT", ['+', '-', '.']),
        Rule::points("SIGN_SUBSEQUENT", ['+', '-', '@']),
        Rule::points("DOT_SUBSEQUENT", ['.']),
        Rule::range("DIGIT", '0', '9'),
        Rule::points("DELIMITER", ['|', '(', ')', '[', ']', '{', '}', '"', ';']),
        Rule::range("UTF8", 128u32, 255u32),
    ]
}

pub fn scheme_encoding() -> Result<FlagEncoding, TableError> {
    use cc::*;
    FlagEncoding::new(
        CLASS_MASK,
        &[
            ("CC::WhitespaceClass", Flag::Class(WHITESPACE_CLASS)),
            ("CC::InitialClass", Flag::Class(INITIAL_CLASS)),
            ("CC::PeculiarIdentClass", Flag::Class(PECULIAR_IDENT_CLASS)),
            ("CC::DigitClass", Flag::Class(DIGIT_CLASS)),
            ("CC::UTF8Class", Flag::Class(UTF8_CLASS)),
            ("CC::Subsequent", Flag::Bit(SUBSEQUENT)),
            ("CC::SignSubsequent", Flag::Bit(SIGN_SUBSEQUENT)),
            ("CC::DotSubsequent", Flag::Bit(DOT_SUBSEQUENT)),
            ("CC::Delimiter", Flag::Bit(DELIMITER)),
        ],
    )
}

pub fn build_scheme_table() -> Result<CharTable> {
    let t0 = Instant::now();
    let model = scheme_model().context("invalid scheme category model")?;
    let rules = scheme_rules();
    let table = apply_rules(&model, &rules).context("applying scheme char-class rules")?;
    log::debug!(
        "[chartab] scheme table: {} rules, {} non-empty bytes ({} us)",
        rules.len(),
        table.iter().filter(|(_, set)| !set.is_empty()).count(),
        t0.elapsed().as_micros()
    );
    Ok(table)
}

/// The full `CharTab.inc` text for the s2020 lexer.
pub fn generate_char_tab() -> Result<String> {
    Ok(render_char_tab(&build_scheme_table()?))
}

pub fn pack_scheme_table(table: &CharTable) -> Result<PackedCharTab> {
    let encoding = scheme_encoding().context("invalid scheme flag encoding")?;
    pack(table, &encoding).context("packing scheme char table")
}

// Mirrors of the lexer's `CC::test*` helpers.
impl PackedCharTab {
    pub fn is_subsequent(&self, byte: u8) -> bool {
        self.test(byte, cc::SUBSEQUENT)
    }

    pub fn is_sign_subsequent(&self, byte: u8) -> bool {
        self.test(byte, cc::SIGN_SUBSEQUENT)
    }

    pub fn is_dot_subsequent(&self, byte: u8) -> bool {
        self.test(byte, cc::DOT_SUBSEQUENT)
    }

    pub fn is_delimiter(&self, byte: u8) -> bool {
        self.test(byte, cc::DELIMITER)
    }
}
