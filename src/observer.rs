//! Progress checkpoints reported during a conversion

use crate::gfa::GfaVersion;
use serde::Serialize;
use tracing::info;

/// A point in the conversion that observers are told about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "checkpoint", rename_all = "snake_case")]
pub enum Checkpoint {
    /// The input file has been read
    Parsed {
        version: GfaVersion,
        segments: usize,
        links: usize,
    },
    /// The strand graph is complete
    Built { vertices: usize, edges: usize },
}

/// Receives checkpoints from [`crate::load::load`] and friends
pub trait ConversionObserver {
    fn checkpoint(&self, checkpoint: &Checkpoint);
}

impl<F> ConversionObserver for F
where
    F: Fn(&Checkpoint),
{
    fn checkpoint(&self, checkpoint: &Checkpoint) {
        self(checkpoint)
    }
}

/// Ignores every checkpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {
    fn checkpoint(&self, _checkpoint: &Checkpoint) {}
}

/// Logs every checkpoint as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn checkpoint(&self, checkpoint: &Checkpoint) {
        match checkpoint {
            Checkpoint::Parsed {
                version,
                segments,
                links,
            } => info!(%version, segments, links, "Loaded GFA records"),
            Checkpoint::Built { vertices, edges } => {
                info!(vertices, edges, "Created strand graph")
            }
        }
    }
}
