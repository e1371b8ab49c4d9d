// src/lexer/chartab/rules.rs
use std::{fmt, time::Instant};

use super::{CategoryModel, CharTable, TableError, TagId, tags::Tag};

/// A byte named either by character literal or by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSpec {
    Char(char),
    Code(u32),
}

impl ByteSpec {
    pub fn resolve(self) -> Result<u8, TableError> {
        let code = match self {
            ByteSpec::Char(c) => c as u32,
            ByteSpec::Code(n) => n,
        };
        u8::try_from(code).map_err(|_| TableError::OutOfRange(code))
    }
}

impl From<char> for ByteSpec {
    fn from(c: char) -> Self {
        ByteSpec::Char(c)
    }
}

impl From<u32> for ByteSpec {
    fn from(n: u32) -> Self {
        ByteSpec::Code(n)
    }
}

impl From<u8> for ByteSpec {
    fn from(b: u8) -> Self {
        ByteSpec::Code(b as u32)
    }
}

impl fmt::Display for ByteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteSpec::Char(c) => write!(f, "{c:?}"),
            ByteSpec::Code(n) => write!(f, "{n}"),
        }
    }
}

/// One declarative assignment of a tag to bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Points { tag: String, bytes: Vec<ByteSpec> },
    /// Inclusive on both ends.
    Range {
        tag: String,
        low: ByteSpec,
        high: ByteSpec,
    },
}

impl Rule {
    pub fn points<B: Into<ByteSpec>>(tag: &str, bytes: impl IntoIterator<Item = B>) -> Self {
        Rule::Points {
            tag: tag.to_string(),
            bytes: bytes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range(tag: &str, low: impl Into<ByteSpec>, high: impl Into<ByteSpec>) -> Self {
        Rule::Range {
            tag: tag.to_string(),
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Rule::Points { tag, .. } | Rule::Range { tag, .. } => tag,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Points { tag, bytes } => {
                write!(f, "{tag} @ {{")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{b}")?;
                }
                write!(f, "}}")
            }
            Rule::Range { tag, low, high } => write!(f, "{tag} @ {low}..={high}"),
        }
    }
}

/// Accumulates tag sets for all 256 bytes against one category model.
pub struct TableBuilder<'m> {
    model: &'m CategoryModel,
    table: CharTable,
}

impl<'m> TableBuilder<'m> {
    pub fn new(model: &'m CategoryModel) -> Self {
        Self {
            model,
            table: CharTable::new(model),
        }
    }

    /// Apply `tag` (expanded through composites) to one byte.
    pub fn apply_tag(&mut self, tag: &str, byte: impl Into<ByteSpec>) -> Result<(), TableError> {
        let id = self.model.tag_id(tag)?;
        let b = byte.into().resolve()?;
        self.insert(id, b);
        Ok(())
    }

    pub fn apply_range(
        &mut self,
        tag: &str,
        low: impl Into<ByteSpec>,
        high: impl Into<ByteSpec>,
    ) -> Result<(), TableError> {
        let id = self.model.tag_id(tag)?;
        let lo = low.into().resolve()?;
        let hi = high.into().resolve()?;
        if hi < lo {
            return Err(TableError::InvalidRange { low: lo, high: hi });
        }
        for b in lo..=hi {
            self.insert(id, b);
        }
        Ok(())
    }

    /// Every point is validated before any of them is applied.
    pub fn apply_points<B: Into<ByteSpec>>(
        &mut self,
        tag: &str,
        bytes: impl IntoIterator<Item = B>,
    ) -> Result<(), TableError> {
        let id = self.model.tag_id(tag)?;
        let resolved = bytes
            .into_iter()
            .map(|b| b.into().resolve())
            .collect::<Result<Vec<u8>, _>>()?;
        for b in resolved {
            self.insert(id, b);
        }
        Ok(())
    }

    pub fn apply(&mut self, rule: &Rule) -> Result<(), TableError> {
        match rule {
            Rule::Points { tag, bytes } => self.apply_points(tag, bytes.iter().copied()),
            Rule::Range { tag, low, high } => self.apply_range(tag, *low, *high),
        }
    }

    // Recursion terminates: the model rejected cyclic composites.
    fn insert(&mut self, id: TagId, byte: u8) {
        let model = self.model;
        match model.tag(id) {
            Tag::Atomic(atom) => {
                self.table.entry_mut(byte).insert(*atom);
            }
            Tag::Composite(parts) => {
                for &p in parts {
                    self.insert(p, byte);
                }
            }
        }
    }

    pub fn table(&self) -> &CharTable {
        &self.table
    }

    pub fn finish(self) -> CharTable {
        self.table
    }
}

/// Apply `rules` in order to a fresh table.
///
/// Stops at the first failing rule; no partially built table is returned.
pub fn apply_rules(model: &CategoryModel, rules: &[Rule]) -> Result<CharTable, TableError> {
    let t0 = Instant::now();
    let mut builder = TableBuilder::new(model);
    for (index, rule) in rules.iter().enumerate() {
        if let Err(e) = builder.apply(rule) {
            log::error!("[chartab] rule #{index} ({rule}) failed: {e}");
            return Err(TableError::Rule {
                index,
                rule: rule.to_string(),
                source: Box::new(e),
            });
        }
    }
    log::debug!(
        "[chartab] applied {} rules in {} us",
        rules.len(),
        t0.elapsed().as_micros()
    );
    Ok(builder.finish())
}
