// src/lexer/chartab/mod.rs
pub mod emit;
pub mod error;
pub mod flags;
pub mod io;
pub mod rules;
pub mod scheme;
pub mod tags;

use std::fmt;

// Re-exports to keep the external API flat.
pub use emit::{emit_line, render_char_tab, write_char_tab};
pub use error::TableError;
pub use flags::{Flag, FlagEncoding, PackedCharTab, pack};
pub use io::{load_packed_bin_bytes, load_packed_json_bytes, save_packed_bin, save_packed_json};
pub use rules::{ByteSpec, Rule, TableBuilder, apply_rules};
pub use scheme::{
    build_scheme_table, generate_char_tab, pack_scheme_table, scheme_encoding, scheme_model,
    scheme_rules,
};
pub use tags::{AtomId, CategoryModel, Tag, TagDecl, TagId, TagKind};

pub const N_BYTES: usize = 256;

/// The set of atoms applied to one byte.
///
/// Stored in insertion order; equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    atoms: Vec<AtomId>,
}

impl TagSet {
    /// Returns false if `atom` was already present.
    pub fn insert(&mut self, atom: AtomId) -> bool {
        if self.atoms.contains(&atom) {
            return false;
        }
        self.atoms.push(atom);
        true
    }

    pub fn contains(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.iter().copied()
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.atoms.iter().all(|a| other.contains(*a))
    }
}
impl Eq for TagSet {}

/// 256 tag sets, one per byte value, plus the atom symbols they refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharTable {
    entries: Vec<TagSet>,
    symbols: Vec<String>,
}

impl CharTable {
    pub fn new(model: &CategoryModel) -> Self {
        Self {
            entries: vec![TagSet::default(); N_BYTES],
            symbols: model.symbols().to_vec(),
        }
    }

    pub fn entry(&self, byte: u8) -> &TagSet {
        &self.entries[byte as usize]
    }

    pub(crate) fn entry_mut(&mut self, byte: u8) -> &mut TagSet {
        &mut self.entries[byte as usize]
    }

    /// `(byte, tag set)` for every byte in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &TagSet)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(b, set)| (b as u8, set))
    }

    pub fn symbol(&self, atom: AtomId) -> &str {
        &self.symbols[atom.0 as usize]
    }

    /// Symbols applied to `byte`, sorted bytewise.
    pub fn sorted_symbols(&self, byte: u8) -> Vec<&str> {
        let mut syms: Vec<&str> = self.entry(byte).iter().map(|a| self.symbol(a)).collect();
        syms.sort_unstable();
        syms
    }

    pub fn has_symbol(&self, byte: u8, symbol: &str) -> bool {
        self.entry(byte).iter().any(|a| self.symbol(a) == symbol)
    }
}

impl fmt::Display for CharTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (b, _) in self.iter() {
            writeln!(f, "{}", emit_line(self, b))?;
        }
        Ok(())
    }
}
