//! Textual preamble recording the frequency table.
//!
//! The header is a single line of space separated decimal pairs
//! `byte frequency`, ascending by byte, each pair followed by a space and the
//! line ended by `\n`. The tree itself is never stored: both sides rebuild it
//! from these counts.

use std::io::{BufRead, Read};

use crate::error::{HuffError, Result};
use crate::freq::{FrequencyTable, SENTINEL, SYMBOLS};

/// Upper bound on a well-formed header line: 256 pairs of a 3 digit byte and
/// a 20 digit count, plus separators.
const MAX_HEADER_LEN: u64 = 8 * 1024;

/// What the decoder has to do once the header is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The source was empty; there is no body.
    Empty,
    /// The source held one distinct byte; the header alone carries it.
    Repeated { byte: u8, count: u64 },
    /// A bit stream follows, coded against the tree built from this table
    /// (sentinel occurrence included).
    Coded(FrequencyTable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    table: FrequencyTable,
}

impl Header {
    /// Wraps a table that already carries the sentinel occurrence.
    pub fn new(table: FrequencyTable) -> Self {
        Header { table }
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn to_line(&self) -> String {
        let mut line: String = self
            .table
            .iter()
            .map(|(byte, count)| format!("{byte} {count} "))
            .collect();
        line.push('\n');
        line
    }

    /// Number of space separated fields in the line, counting the empty field
    /// after the last separator. Three means an empty source, five a source of
    /// one repeated byte.
    pub fn field_count(&self) -> usize {
        self.table.distinct() * 2 + 1
    }

    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() % 2 != 0 {
            return Err(HuffError::malformed(format!(
                "odd number of tokens ({})",
                tokens.len()
            )));
        }

        let mut counts = [0u64; SYMBOLS];
        let mut total = 0u64;
        for pair in tokens.chunks_exact(2) {
            let byte: u8 = pair[0]
                .parse()
                .map_err(|_| HuffError::malformed(format!("invalid byte value `{}`", pair[0])))?;
            let count: u64 = pair[1]
                .parse()
                .map_err(|_| HuffError::malformed(format!("invalid frequency `{}`", pair[1])))?;
            if count == 0 {
                return Err(HuffError::malformed(format!("zero frequency for byte {byte}")));
            }
            if counts[byte as usize] != 0 {
                return Err(HuffError::malformed(format!("byte {byte} listed twice")));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| HuffError::malformed("frequency total overflows"))?;
            counts[byte as usize] = count;
        }

        if !tokens.is_empty() && counts[SENTINEL as usize] == 0 {
            return Err(HuffError::malformed("missing end-of-data entry for byte 0"));
        }
        Ok(Header {
            table: FrequencyTable::from_counts(counts),
        })
    }

    /// Reads the header line, leaving `reader` positioned at the first body
    /// byte. An input with no bytes at all yields a blank header.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self> {
        let mut raw = Vec::new();
        let n = reader.by_ref().take(MAX_HEADER_LEN).read_until(b'\n', &mut raw)?;
        if n == 0 {
            return Ok(Header::default());
        }
        if raw.last() != Some(&b'\n') {
            return Err(HuffError::malformed("header line is not terminated"));
        }
        let line = std::str::from_utf8(&raw)
            .map_err(|_| HuffError::malformed("header is not ASCII text"))?;
        Self::parse(line)
    }

    pub fn payload(&self) -> Payload {
        let real = self
            .table
            .without_sentinel()
            .unwrap_or_else(|| self.table.clone());

        let mut present = real.iter();
        match (present.next(), present.next()) {
            (None, _) => Payload::Empty,
            (Some((byte, count)), None) => Payload::Repeated { byte, count },
            _ => Payload::Coded(self.table.clone()),
        }
    }
}
