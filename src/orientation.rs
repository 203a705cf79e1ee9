//! Orientation resolution
//!
//! A link read 5'->3' on one strand has a mirror reading on the other
//! strand, traversed in the opposite order with both endpoints flipped.
//! [`resolve`] turns one oriented link into both of those directed edges.

use crate::error::{ConvertError, Result};
use crate::gfa::LinkRecord;
use crate::strand::StrandId;

/// Orientation of a segment end in a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    fn from_sign(sign: &str) -> Option<Self> {
        match sign {
            "+" => Some(Orientation::Forward),
            "-" => Some(Orientation::Reverse),
            _ => None,
        }
    }
}

/// A directed edge between two strand vertices
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrandEdge {
    pub from: StrandId,
    pub to: StrandId,
}

impl StrandEdge {
    pub fn new(from: StrandId, to: StrandId) -> Self {
        Self { from, to }
    }

    /// The same adjacency read on the opposite strand
    pub fn mirror(&self) -> Self {
        Self::new(self.to.complement(), self.from.complement())
    }
}

/// Derive the forward-strand and complement-strand edges of a link.
///
/// | orient | forward         | complement      |
/// |--------|-----------------|-----------------|
/// | `++`   | (F, T)          | (~T, ~F)        |
/// | `--`   | (~F, ~T)        | (T, F)          |
/// | `+-`   | (F, ~T)         | (T, ~F)         |
/// | `-+`   | (~F, T)         | (~T, F)         |
///
/// Any other orientation code fails with
/// [`ConvertError::UnknownOrientation`].
pub fn resolve(link: &LinkRecord) -> Result<(StrandEdge, StrandEdge)> {
    let from = StrandId::forward(link.from_name.as_str());
    let to = StrandId::forward(link.to_name.as_str());
    let inv_from = from.complement();
    let inv_to = to.complement();

    let orient = (
        Orientation::from_sign(&link.from_orient),
        Orientation::from_sign(&link.to_orient),
    );

    let edges = match orient {
        (Some(Orientation::Forward), Some(Orientation::Forward)) => (
            StrandEdge::new(from, to),
            StrandEdge::new(inv_to, inv_from),
        ),
        (Some(Orientation::Reverse), Some(Orientation::Reverse)) => (
            StrandEdge::new(inv_from, inv_to),
            StrandEdge::new(to, from),
        ),
        (Some(Orientation::Forward), Some(Orientation::Reverse)) => (
            StrandEdge::new(from, inv_to),
            StrandEdge::new(to, inv_from),
        ),
        (Some(Orientation::Reverse), Some(Orientation::Forward)) => (
            StrandEdge::new(inv_from, to),
            StrandEdge::new(inv_to, from),
        ),
        _ => {
            return Err(ConvertError::UnknownOrientation {
                code: format!("{}{}", link.from_orient, link.to_orient),
                line: link.line,
            })
        }
    };

    Ok(edges)
}
