//! Loading a GFA file into a strand graph

use crate::builder::{build, StrandGraph};
use crate::error::{ConvertError, Result};
use crate::gfa::{GfaDocument, RecordSource};
use crate::observer::{Checkpoint, ConversionObserver};
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

/// Read the GFA file at `path` and build its strand graph.
///
/// A missing path is reported as [`ConvertError::PathNotFound`] before the
/// file is opened. Reader failures surface as [`ConvertError::Parse`].
pub fn load<P: AsRef<Path>>(path: P, observer: &dyn ConversionObserver) -> Result<StrandGraph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConvertError::PathNotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "Reading GFA file");
    let document = GfaDocument::from_file(path)?;
    build_document(&document, observer)
}

/// Same as [`load`] for input that is already open
pub fn load_reader<R: BufRead>(
    reader: R,
    observer: &dyn ConversionObserver,
) -> Result<StrandGraph> {
    let document = GfaDocument::parse(reader)?;
    build_document(&document, observer)
}

/// Dispatch a parsed document to the builder by version
pub fn build_document(
    document: &GfaDocument,
    observer: &dyn ConversionObserver,
) -> Result<StrandGraph> {
    let source: &dyn RecordSource = match document {
        GfaDocument::V1(gfa) => gfa,
        GfaDocument::V2(gfa) => gfa,
        GfaDocument::Unsupported { version } => {
            return Err(ConvertError::UnsupportedVersion(version.clone()))
        }
    };

    observer.checkpoint(&Checkpoint::Parsed {
        version: source.version(),
        segments: source.segment_count(),
        links: source.link_count(),
    });

    let graph = build(source)?;

    observer.checkpoint(&Checkpoint::Built {
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    });

    Ok(graph)
}
