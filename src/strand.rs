//! Strand identities for double-stranded segments
//!
//! Every segment is represented twice in the output graph: once for the
//! strand as written in the file and once for its reverse complement. A
//! [`StrandId`] names one of those two vertices explicitly; the string form
//! with a leading [`COMPLEMENT_MARKER`] only exists at the export boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading character marking a complement strand in flat vertex keys
pub const COMPLEMENT_MARKER: char = '_';

/// Map a segment key to its reverse-complement key and back.
///
/// Strips exactly one leading marker if present, otherwise prepends one.
/// `complement_name(x) != x` always holds; `complement_name(complement_name(x))
/// == x` holds only when `x` starts with at most one marker (`"__A"` maps to
/// `"_A"` and back to `"A"`).
pub fn complement_name(name: &str) -> String {
    match name.strip_prefix(COMPLEMENT_MARKER) {
        Some(rest) => rest.to_string(),
        None => format!("{}{}", COMPLEMENT_MARKER, name),
    }
}

/// Which strand of a segment a vertex stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Complement,
}

impl Strand {
    /// The opposite strand
    pub fn flip(self) -> Self {
        match self {
            Strand::Forward => Strand::Complement,
            Strand::Complement => Strand::Forward,
        }
    }
}

/// One strand of one segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrandId {
    /// Segment identifier as written in the GFA file
    pub segment: String,
    /// Strand of that segment
    pub strand: Strand,
}

impl StrandId {
    pub fn new(segment: impl Into<String>, strand: Strand) -> Self {
        Self {
            segment: segment.into(),
            strand,
        }
    }

    pub fn forward(segment: impl Into<String>) -> Self {
        Self::new(segment, Strand::Forward)
    }

    pub fn reverse_complement(segment: impl Into<String>) -> Self {
        Self::new(segment, Strand::Complement)
    }

    /// The same segment on the opposite strand
    pub fn complement(&self) -> Self {
        Self::new(self.segment.clone(), self.strand.flip())
    }

    /// Flat string key handed to graph exporters.
    pub fn key(&self) -> String {
        match self.strand {
            Strand::Forward => self.segment.clone(),
            Strand::Complement => complement_name(&self.segment),
        }
    }
}

impl fmt::Display for StrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
