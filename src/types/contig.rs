//! Contig types for the path kernel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a contig in the assembly graph.
///
/// Ids are 1-based and dense. Implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContigId(u32);

impl ContigId {
    /// Create a new ContigId.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ContigId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// One of the two oriented ends of a contig.
///
/// Assembler output encodes these as `5` (Head) and `3` (Tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terminus {
    /// The 5' end.
    Head,
    /// The 3' end.
    Tail,
}

impl Terminus {
    /// The other end of the same contig.
    pub fn opposite(self) -> Self {
        match self {
            Self::Head => Self::Tail,
            Self::Tail => Self::Head,
        }
    }

    /// Parse a terminus code such as `5`, `3'` or `"5'"`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().trim_matches('"').trim_end_matches('\'') {
            "5" => Some(Self::Head),
            "3" => Some(Self::Tail),
            _ => None,
        }
    }

    /// The numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            Self::Head => 5,
            Self::Tail => 3,
        }
    }

    /// Slot index used by two-sided adjacency tables.
    pub(crate) fn side(self) -> usize {
        match self {
            Self::Head => 0,
            Self::Tail => 1,
        }
    }
}

impl fmt::Display for Terminus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'", self.code())
    }
}

/// An assembled sequence fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contig {
    /// Contig id.
    pub id: ContigId,
    /// Display name as written by the assembler.
    pub name: String,
    /// Length in base pairs.
    pub length: u64,
    /// Read coverage depth.
    pub depth: f64,
}

impl Contig {
    /// Create a new contig.
    pub fn new(id: ContigId, name: impl Into<String>, length: u64, depth: f64) -> Self {
        Self {
            id,
            name: name.into(),
            length,
            depth,
        }
    }

    /// Derived score: `sqrt(sqrt(depth) * length)`.
    pub fn score(&self) -> f64 {
        (self.depth.max(0.0).sqrt() * self.length as f64).sqrt()
    }
}

/// Read-only table of contigs, indexed by id.
///
/// Shared by every stage of the pipeline; never mutated after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContigTable {
    contigs: Vec<Contig>,
    #[serde(skip)]
    by_name: BTreeMap<String, ContigId>,
}

impl ContigTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from contigs listed in id order (1, 2, 3, ...).
    ///
    /// Returns the first contig whose id breaks the dense sequence.
    pub fn from_contigs(contigs: Vec<Contig>) -> Result<Self, ContigId> {
        let mut table = Self::new();
        for contig in contigs {
            table.push(contig)?;
        }
        Ok(table)
    }

    /// Append the next contig. Its id must equal `len() + 1`.
    pub fn push(&mut self, contig: Contig) -> Result<(), ContigId> {
        if contig.id.get() as usize != self.contigs.len() + 1 {
            return Err(contig.id);
        }
        self.by_name.insert(contig.name.clone(), contig.id);
        self.contigs.push(contig);
        Ok(())
    }

    /// Look up a contig by id.
    pub fn get(&self, id: ContigId) -> Option<&Contig> {
        (id.get() as usize)
            .checked_sub(1)
            .and_then(|idx| self.contigs.get(idx))
    }

    /// Look up a contig id by display name.
    pub fn id_by_name(&self, name: &str) -> Option<ContigId> {
        self.by_name.get(name).copied()
    }

    /// Whether the id refers to a contig in this table.
    pub fn contains(&self, id: ContigId) -> bool {
        self.get(id).is_some()
    }

    /// Depth of a contig, 0.0 for unknown ids.
    pub fn depth(&self, id: ContigId) -> f64 {
        self.get(id).map_or(0.0, |c| c.depth)
    }

    /// Length of a contig, 0 for unknown ids.
    pub fn length(&self, id: ContigId) -> u64 {
        self.get(id).map_or(0, |c| c.length)
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Iterate contigs in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }
}
