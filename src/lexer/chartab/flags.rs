// src/lexer/chartab/flags.rs
use hashbrown::HashMap;

use super::{CharTable, N_BYTES, TableError};

/// How one atom symbol is stored in a packed flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Value of the class field (the bits under the class mask). One per byte.
    Class(u8),
    /// Independent bit above the class field.
    Bit(u8),
}

/// Symbol -> flag mapping for one consumer.
#[derive(Debug, Clone)]
pub struct FlagEncoding {
    class_mask: u8,
    by_symbol: HashMap<String, Flag>,
}

impl FlagEncoding {
    pub fn new(class_mask: u8, entries: &[(&str, Flag)]) -> Result<Self, TableError> {
        let invalid = |symbol: &str, reason: String| TableError::InvalidEncoding {
            symbol: symbol.to_string(),
            reason,
        };

        let mut by_symbol = HashMap::with_capacity(entries.len());
        let mut bit_owner: HashMap<u8, &str> = HashMap::new();
        let mut class_owner: HashMap<u8, &str> = HashMap::new();
        for &(symbol, flag) in entries {
            match flag {
                Flag::Class(v) => {
                    if v == 0 || v & !class_mask != 0 {
                        return Err(invalid(
                            symbol,
                            format!("class {v} does not fit mask {class_mask:#04x}"),
                        ));
                    }
                    if let Some(other) = class_owner.insert(v, symbol) {
                        return Err(invalid(
                            symbol,
                            format!("class {v} already used by `{other}`"),
                        ));
                    }
                }
                Flag::Bit(v) => {
                    if v.count_ones() != 1 || v & class_mask != 0 {
                        return Err(invalid(
                            symbol,
                            format!(
                                "bit {v:#04x} must be a single bit outside mask {class_mask:#04x}"
                            ),
                        ));
                    }
                    if let Some(other) = bit_owner.insert(v, symbol) {
                        return Err(invalid(
                            symbol,
                            format!("bit {v:#04x} already used by `{other}`"),
                        ));
                    }
                }
            }
            if by_symbol.insert(symbol.to_string(), flag).is_some() {
                return Err(invalid(symbol, "encoded twice".to_string()));
            }
        }
        Ok(Self {
            class_mask,
            by_symbol,
        })
    }

    pub fn class_mask(&self) -> u8 {
        self.class_mask
    }

    pub fn get(&self, symbol: &str) -> Option<Flag> {
        self.by_symbol.get(symbol).copied()
    }
}

/// The numeric table the lexer indexes at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedCharTab {
    pub flags: [u8; N_BYTES],
    pub class_mask: u8,
}

impl PackedCharTab {
    #[inline]
    pub fn flags(&self, byte: u8) -> u8 {
        self.flags[byte as usize]
    }

    #[inline]
    pub fn class_of(&self, byte: u8) -> u8 {
        self.flags(byte) & self.class_mask
    }

    #[inline]
    pub fn test(&self, byte: u8, bit: u8) -> bool {
        self.flags(byte) & bit != 0
    }
}

/// Evaluate every tag set into its flag byte.
pub fn pack(table: &CharTable, encoding: &FlagEncoding) -> Result<PackedCharTab, TableError> {
    let mut flags = [0u8; N_BYTES];
    for (b, _) in table.iter() {
        let mut class: Option<(u8, &str)> = None;
        let mut bits = 0u8;
        for sym in table.sorted_symbols(b) {
            match encoding.get(sym) {
                None => return Err(TableError::UnencodedTag(sym.to_string())),
                Some(Flag::Bit(v)) => bits |= v,
                Some(Flag::Class(v)) => {
                    if let Some((_, first)) = class {
                        return Err(TableError::ClassConflict {
                            byte: b,
                            first: first.to_string(),
                            second: sym.to_string(),
                        });
                    }
                    class = Some((v, sym));
                }
            }
        }
        flags[b as usize] = class.map_or(0, |(v, _)| v) | bits;
    }
    Ok(PackedCharTab {
        flags,
        class_mask: encoding.class_mask(),
    })
}
