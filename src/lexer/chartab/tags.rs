// src/lexer/chartab/tags.rs
use hashbrown::HashMap;

use super::error::TableError;

/// Index of an atomic tag inside a [`CategoryModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u16);

/// Index of any tag (atomic or composite) inside a [`CategoryModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(pub u16);

/// A resolved tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Atomic(AtomId),
    /// Applying a composite applies every constituent, in order.
    Composite(Vec<TagId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// Carries the symbol the emitter prints, e.g. `CC::InitialClass`.
    Atomic { symbol: String },
    Composite { parts: Vec<String> },
}

/// One entry of the declarative category configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDecl {
    pub name: String,
    pub kind: TagKind,
}

impl TagDecl {
    pub fn atomic(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TagKind::Atomic {
                symbol: symbol.to_string(),
            },
        }
    }

    pub fn composite(name: &str, parts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: TagKind::Composite {
                parts: parts.iter().map(|p| p.to_string()).collect(),
            },
        }
    }
}

/// The closed set of tags used by one grammar, validated up front.
///
/// Construction rejects duplicate names, unknown constituents, empty
/// composites and cycles, so expanding any tag of a built model terminates.
#[derive(Debug, Clone)]
pub struct CategoryModel {
    names: Vec<String>,
    tags: Vec<Tag>,
    symbols: Vec<String>,
    by_name: HashMap<String, TagId>,
}

impl CategoryModel {
    pub fn new(decls: &[TagDecl]) -> Result<Self, TableError> {
        let mut by_name = HashMap::with_capacity(decls.len());
        for (i, d) in decls.iter().enumerate() {
            let id = u16::try_from(i).map_err(|_| TableError::TooManyTags(decls.len()))?;
            if by_name.insert(d.name.clone(), TagId(id)).is_some() {
                return Err(TableError::DuplicateTag(d.name.clone()));
            }
        }

        // Second pass so composites may refer to tags declared after them.
        let mut tags = Vec::with_capacity(decls.len());
        let mut symbols: Vec<String> = Vec::new();
        // An atom is its symbol: names sharing a symbol share one AtomId.
        let mut atom_of: HashMap<&str, AtomId> = HashMap::new();
        for d in decls {
            let tag = match &d.kind {
                TagKind::Atomic { symbol } => {
                    let atom = match atom_of.get(symbol.as_str()) {
                        Some(&atom) => atom,
                        None => {
                            // Bounded by the TagId check above.
                            let atom = AtomId(symbols.len() as u16);
                            symbols.push(symbol.clone());
                            atom_of.insert(symbol, atom);
                            atom
                        }
                    };
                    Tag::Atomic(atom)
                }
                TagKind::Composite { parts } => {
                    if parts.is_empty() {
                        return Err(TableError::EmptyComposite(d.name.clone()));
                    }
                    let ids = parts
                        .iter()
                        .map(|p| {
                            by_name
                                .get(p.as_str())
                                .copied()
                                .ok_or_else(|| TableError::UnknownTag(p.clone()))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Tag::Composite(ids)
                }
            };
            tags.push(tag);
        }

        let model = Self {
            names: decls.iter().map(|d| d.name.clone()).collect(),
            tags,
            symbols,
            by_name,
        };
        model.check_acyclic()?;
        Ok(model)
    }

    fn check_acyclic(&self) -> Result<(), TableError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        fn visit(
            model: &CategoryModel,
            id: TagId,
            marks: &mut [Mark],
            stack: &mut Vec<TagId>,
        ) -> Result<(), TableError> {
            let i = id.0 as usize;
            match marks[i] {
                Mark::Done => return Ok(()),
                Mark::OnStack => {
                    let from = stack.iter().position(|&t| t == id).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[from..].iter().map(|&t| model.name(t).to_string()).collect();
                    path.push(model.name(id).to_string());
                    return Err(TableError::CyclicComposite {
                        name: model.name(id).to_string(),
                        path,
                    });
                }
                Mark::Unvisited => {}
            }
            if let Tag::Composite(parts) = &model.tags[i] {
                marks[i] = Mark::OnStack;
                stack.push(id);
                for &p in parts {
                    visit(model, p, marks, stack)?;
                }
                stack.pop();
            }
            marks[i] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.tags.len()];
        let mut stack = Vec::new();
        for i in 0..self.tags.len() {
            visit(self, TagId(i as u16), &mut marks, &mut stack)?;
        }
        Ok(())
    }

    pub fn tag_id(&self, name: &str) -> Result<TagId, TableError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TableError::UnknownTag(name.to_string()))
    }

    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0 as usize]
    }

    pub fn name(&self, id: TagId) -> &str {
        &self.names[id.0 as usize]
    }

    /// Emitted symbol of an atom.
    pub fn symbol(&self, atom: AtomId) -> &str {
        &self.symbols[atom.0 as usize]
    }

    /// All atom symbols, indexed by `AtomId`.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Atoms a tag stands for: depth-first, declaration order, each atom once.
    pub fn expand(&self, id: TagId) -> Vec<AtomId> {
        let mut out = Vec::new();
        self.expand_into(id, &mut out);
        out
    }

    fn expand_into(&self, id: TagId, out: &mut Vec<AtomId>) {
        match self.tag(id) {
            Tag::Atomic(atom) => {
                if !out.contains(atom) {
                    out.push(*atom);
                }
            }
            Tag::Composite(parts) => {
                for &p in parts {
                    self.expand_into(p, out);
                }
            }
        }
    }
}
