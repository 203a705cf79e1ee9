//! gfaconvert - GFA to directed graph conversion
//!
//! Reads GFA 1 and GFA 2 assembly graphs and builds a directed graph that
//! models both strands of every segment: each segment becomes a forward and
//! a reverse-complement vertex joined by a virtual edge, and each link is
//! mirrored onto the complementary strand. The graph can be written as DOT,
//! GraphML or GML.
//!
//! # Example
//!
//! ```no_run
//! use gfaconvert::export::{write_graph, GraphFormat};
//! use gfaconvert::load::load;
//! use gfaconvert::observer::TracingObserver;
//!
//! let graph = load("example.gfa", &TracingObserver).unwrap();
//! println!("{} vertices, {} edges", graph.vertex_count(), graph.edge_count());
//!
//! write_graph(&graph, "example.graphml", GraphFormat::GraphMl).unwrap();
//! ```

pub mod builder;
pub mod cli;
pub mod error;
pub mod export;
pub mod gfa;
pub mod load;
pub mod observer;
pub mod orientation;
pub mod strand;

pub use builder::{build, EdgeKind, StrandGraph};
pub use error::{ConvertError, GfaError, Result};
pub use export::{write_graph, GraphFormat};
pub use gfa::{GfaDocument, GfaVersion, LinkRecord, RecordSource, SegmentRecord};
pub use load::load;
pub use orientation::resolve;
pub use strand::{complement_name, Strand, StrandId};
