//! Error types for gfaconvert

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gfaconvert operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while reading a GFA file
#[derive(Error, Debug)]
pub enum GfaError {
    /// IO errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record with missing or unreadable fields
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Segment identifier seen twice
    #[error("duplicate segment '{name}' at line {line}")]
    DuplicateSegment { line: usize, name: String },

    /// Edge endpoint without a matching `S` record
    #[error("edge at line {line} references undefined segment '{name}'")]
    UndefinedSegment { line: usize, name: String },
}

/// Main error type for a conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input path does not exist; raised before any parsing
    #[error("no such file: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Declared GFA version is neither 1 nor 2
    #[error("unsupported GFA version: {0}")]
    UnsupportedVersion(String),

    /// Link orientation code outside ++, --, +-, -+
    #[error("unknown orientation '{code}' on edge at line {line}")]
    UnknownOrientation { code: String, line: usize },

    /// Underlying GFA reader failure
    #[error("failed to parse GFA: {0}")]
    Parse(#[from] GfaError),

    /// Export format outside dot, graphml, gml
    #[error("unsupported format '{0}' (expected one of: dot, graphml, gml)")]
    UnsupportedFormat(String),

    /// IO errors while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
