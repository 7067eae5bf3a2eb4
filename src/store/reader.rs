//! Line-oriented contig graph reader.
//!
//! ## Format
//!
//! ```text
//! # vertices: id  name  length  depth
//! 1   contig00001   15234   31.5
//! 2   contig00002   812     29.0
//! # edges: C  left  left_terminus  right  right_terminus  depth
//! C   1   3'  2   5'  18
//! ```
//!
//! Columns are tab separated. Blank lines and `#` comments are skipped.
//! Vertex lines come first; once the edge block has started, the first
//! line that is not an edge ends the graph.

use std::io::BufRead;

use crate::types::{Contig, ContigId, Link, LinkEnd, Terminus};
use super::memory::{InMemoryError, InMemoryGraphStore};

/// Error reading a contig graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphReadError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A line had the wrong shape.
    #[error("Line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
    /// The parsed records were inconsistent.
    #[error("Line {line}: {source}")]
    Inconsistent {
        /// 1-based line number.
        line: usize,
        /// Underlying store error.
        source: InMemoryError,
    },
}

impl GraphReadError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

fn field<T: std::str::FromStr>(line: usize, name: &str, value: &str) -> Result<T, GraphReadError> {
    value
        .trim()
        .parse()
        .map_err(|_| GraphReadError::malformed(line, format!("invalid {name} '{value}'")))
}

fn terminus(line: usize, value: &str) -> Result<Terminus, GraphReadError> {
    Terminus::from_str(value)
        .ok_or_else(|| GraphReadError::malformed(line, format!("invalid terminus '{value}'")))
}

/// Read a contig graph from text.
pub fn read_graph<R: BufRead>(input: R) -> Result<InMemoryGraphStore, GraphReadError> {
    let mut store = InMemoryGraphStore::new();
    let mut in_edges = false;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let cols: Vec<&str> = trimmed.split('\t').collect();
        if cols[0] == "C" {
            in_edges = true;
            if cols.len() != 6 {
                return Err(GraphReadError::malformed(
                    line_no,
                    format!("edge line needs 6 columns, found {}", cols.len()),
                ));
            }
            let left = LinkEnd::new(
                ContigId::new(field(line_no, "contig id", cols[1])?),
                terminus(line_no, cols[2])?,
            );
            let right = LinkEnd::new(
                ContigId::new(field(line_no, "contig id", cols[3])?),
                terminus(line_no, cols[4])?,
            );
            let depth: f64 = field(line_no, "link depth", cols[5])?;
            store
                .add_link(Link::new(left, right, depth))
                .map_err(|source| GraphReadError::Inconsistent { line: line_no, source })?;
        } else if in_edges {
            break;
        } else {
            if cols.len() != 4 {
                return Err(GraphReadError::malformed(
                    line_no,
                    format!("vertex line needs 4 columns, found {}", cols.len()),
                ));
            }
            let contig = Contig::new(
                ContigId::new(field(line_no, "contig id", cols[0])?),
                cols[1].trim(),
                field(line_no, "length", cols[2])?,
                field(line_no, "depth", cols[3])?,
            );
            store
                .add_contig(contig)
                .map_err(|source| GraphReadError::Inconsistent { line: line_no, source })?;
        }
    }

    tracing::debug!(
        contigs = store.num_contigs(),
        links = store.num_links(),
        "Contig graph loaded"
    );
    Ok(store)
}
