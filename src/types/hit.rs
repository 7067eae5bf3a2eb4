//! Similarity-search hit records.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Error parsing a tabular hit record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HitParseError {
    /// Wrong number of columns.
    #[error("Line {line}: expected 12 columns, found {found}")]
    ColumnCount {
        /// 1-based line number.
        line: usize,
        /// Columns found.
        found: usize,
    },
    /// A numeric column did not parse.
    #[error("Line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Column name.
        column: &'static str,
        /// Offending text.
        value: String,
    },
}

/// One tabular similarity-search record (12 columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityHit {
    /// Query sequence id (a contig name or id).
    pub query: String,
    /// Target sequence id (a marker gene or contig).
    pub target: String,
    /// Percent identity, 0-100.
    pub identity: f64,
    /// Alignment length in bp.
    pub align_len: u64,
    /// Mismatch count.
    pub mismatches: u64,
    /// Gap openings.
    pub gaps: u64,
    /// Query start (1-based).
    pub q_start: u64,
    /// Query end (1-based).
    pub q_end: u64,
    /// Subject start.
    pub s_start: u64,
    /// Subject end.
    pub s_end: u64,
    /// Expect value.
    pub evalue: f64,
    /// Bit score.
    pub bit_score: f64,
}

impl SimilarityHit {
    /// Marker gene name: the text after the last `_` of the target id.
    pub fn gene(&self) -> &str {
        self.target.rsplit('_').next().unwrap_or(&self.target)
    }

    /// Parse one record. `line` is used for error messages only.
    pub fn parse_line(text: &str, line: usize) -> Result<Self, HitParseError> {
        let cols: Vec<&str> = text.split('\t').map(str::trim).collect();
        if cols.len() != 12 {
            return Err(HitParseError::ColumnCount { line, found: cols.len() });
        }

        fn num<T: FromStr>(line: usize, column: &'static str, value: &str) -> Result<T, HitParseError> {
            value.parse().map_err(|_| HitParseError::InvalidNumber {
                line,
                column,
                value: value.to_string(),
            })
        }

        Ok(Self {
            query: cols[0].to_string(),
            target: cols[1].to_string(),
            identity: num(line, "identity", cols[2])?,
            align_len: num(line, "alignment length", cols[3])?,
            mismatches: num(line, "mismatches", cols[4])?,
            gaps: num(line, "gaps", cols[5])?,
            q_start: num(line, "q-start", cols[6])?,
            q_end: num(line, "q-end", cols[7])?,
            s_start: num(line, "s-start", cols[8])?,
            s_end: num(line, "s-end", cols[9])?,
            evalue: num(line, "e-value", cols[10])?,
            bit_score: num(line, "bit score", cols[11])?,
        })
    }

    /// Parse a whole tabular report, skipping blank and `#` lines.
    pub fn parse_all(text: &str) -> Result<Vec<Self>, HitParseError> {
        text.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'))
            .map(|(i, l)| Self::parse_line(l, i + 1))
            .collect()
    }
}
