//! GFA (Graphical Fragment Assembly) reader
//!
//! Reads GFA 1 and GFA 2 files far enough to recover what the strand graph
//! needs: segment identifiers and oriented edges between them. Sequences,
//! overlaps and alignment coordinates are read past.

use crate::error::GfaError;
use flate2::read::GzDecoder;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// GFA version declared by (or inferred from) a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GfaVersion {
    V1,
    V2,
    /// Any other declared `VN` value, kept verbatim
    Unsupported(String),
}

impl GfaVersion {
    /// Interpret the value of a `VN:Z:` header tag
    pub fn from_tag(value: &str) -> Self {
        match value.trim() {
            "1" | "1.0" | "1.1" | "1.2" => GfaVersion::V1,
            "2" | "2.0" => GfaVersion::V2,
            other => GfaVersion::Unsupported(other.to_string()),
        }
    }
}

impl std::fmt::Display for GfaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GfaVersion::V1 => write!(f, "gfa1"),
            GfaVersion::V2 => write!(f, "gfa2"),
            GfaVersion::Unsupported(v) => write!(f, "{}", v),
        }
    }
}

/// A segment (node) record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    /// Segment identifier
    pub sid: String,
    /// 1-based line number in the source file
    pub line: usize,
}

/// An oriented edge between two segments (GFA1 `L`/`C`, GFA2 `E`)
///
/// Orientations are kept as written; they are checked when the edge is
/// resolved onto strands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub from_name: String,
    pub from_orient: String,
    pub to_name: String,
    pub to_orient: String,
    /// 1-based line number in the source file
    pub line: usize,
}

/// Parsed GFA 1 file
#[derive(Debug, Clone, Default)]
pub struct Gfa1 {
    pub segments: Vec<SegmentRecord>,
    pub links: Vec<LinkRecord>,
    pub containments: Vec<LinkRecord>,
}

/// Parsed GFA 2 file
#[derive(Debug, Clone, Default)]
pub struct Gfa2 {
    pub segments: Vec<SegmentRecord>,
    /// `E` records; edge identifiers are not kept
    pub edges: Vec<LinkRecord>,
}

/// Segment and edge iteration over a parsed file, whatever its version
pub trait RecordSource {
    fn version(&self) -> GfaVersion;

    fn segments(&self) -> Box<dyn Iterator<Item = &SegmentRecord> + '_>;

    fn links(&self) -> Box<dyn Iterator<Item = &LinkRecord> + '_>;

    fn segment_count(&self) -> usize {
        self.segments().count()
    }

    fn link_count(&self) -> usize {
        self.links().count()
    }
}

impl RecordSource for Gfa1 {
    fn version(&self) -> GfaVersion {
        GfaVersion::V1
    }

    fn segments(&self) -> Box<dyn Iterator<Item = &SegmentRecord> + '_> {
        Box::new(self.segments.iter())
    }

    // Containments are oriented adjacencies too; they follow the links.
    fn links(&self) -> Box<dyn Iterator<Item = &LinkRecord> + '_> {
        Box::new(self.links.iter().chain(self.containments.iter()))
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn link_count(&self) -> usize {
        self.links.len() + self.containments.len()
    }
}

impl RecordSource for Gfa2 {
    fn version(&self) -> GfaVersion {
        GfaVersion::V2
    }

    fn segments(&self) -> Box<dyn Iterator<Item = &SegmentRecord> + '_> {
        Box::new(self.segments.iter())
    }

    fn links(&self) -> Box<dyn Iterator<Item = &LinkRecord> + '_> {
        Box::new(self.edges.iter())
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn link_count(&self) -> usize {
        self.edges.len()
    }
}

/// A parsed GFA file, tagged by version
#[derive(Debug, Clone)]
pub enum GfaDocument {
    V1(Gfa1),
    V2(Gfa2),
    /// Declared version we cannot read; records are not parsed
    Unsupported { version: String },
}

/// Open a GFA or GFA.GZ file for buffered reading
pub fn open_gfa_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, GfaError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)?;

    if let Some(ext) = path_ref.extension() {
        if ext == "gz" {
            let decoder = GzDecoder::new(file);
            return Ok(Box::new(BufReader::new(decoder)));
        }
    }

    Ok(Box::new(BufReader::new(file)))
}

impl GfaDocument {
    /// Parse a GFA file from a path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GfaError> {
        let reader = open_gfa_reader(path)?;
        Self::parse(reader)
    }

    /// Parse GFA from a buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, GfaError> {
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            records.push((line_num + 1, line.to_string()));
        }

        match detect_version(&records) {
            GfaVersion::V1 => parse_gfa1(&records).map(GfaDocument::V1),
            GfaVersion::V2 => parse_gfa2(&records).map(GfaDocument::V2),
            GfaVersion::Unsupported(version) => Ok(GfaDocument::Unsupported { version }),
        }
    }

    pub fn version(&self) -> GfaVersion {
        match self {
            GfaDocument::V1(_) => GfaVersion::V1,
            GfaDocument::V2(_) => GfaVersion::V2,
            GfaDocument::Unsupported { version } => GfaVersion::Unsupported(version.clone()),
        }
    }
}

/// The `VN` header tag wins; without one, any GFA2-only record type marks
/// the file as GFA2.
fn detect_version(records: &[(usize, String)]) -> GfaVersion {
    let mut inferred = GfaVersion::V1;

    for (_, line) in records {
        let mut fields = line.split('\t');
        match fields.next() {
            Some("H") => {
                for field in fields {
                    if let Some(value) = field.strip_prefix("VN:Z:") {
                        return GfaVersion::from_tag(value);
                    }
                }
            }
            Some("E" | "F" | "G" | "O" | "U") => inferred = GfaVersion::V2,
            _ => {}
        }
    }

    inferred
}

fn parse_gfa1(records: &[(usize, String)]) -> Result<Gfa1, GfaError> {
    let mut gfa = Gfa1::default();
    let mut names = HashSet::new();

    for (line, record) in records {
        let fields: Vec<&str> = record.split('\t').collect();
        match fields[0] {
            "S" => {
                require_fields(&fields, 3, "Segment", *line)?;
                gfa.segments
                    .push(register_segment(&mut names, fields[1], *line)?);
            }
            "L" => {
                require_fields(&fields, 6, "Link", *line)?;
                gfa.links.push(link_from_fields(&fields, *line));
            }
            "C" => {
                require_fields(&fields, 7, "Containment", *line)?;
                gfa.containments.push(link_from_fields(&fields, *line));
            }
            _ => {
                // H is read by detect_version; P, W and unknown record types
                // carry nothing we need
            }
        }
    }

    check_references(&names, gfa.links.iter().chain(gfa.containments.iter()))?;
    Ok(gfa)
}

fn parse_gfa2(records: &[(usize, String)]) -> Result<Gfa2, GfaError> {
    let mut gfa = Gfa2::default();
    let mut names = HashSet::new();

    for (line, record) in records {
        let fields: Vec<&str> = record.split('\t').collect();
        match fields[0] {
            "S" => {
                // S <sid> <slen> <sequence>
                require_fields(&fields, 4, "Segment", *line)?;
                gfa.segments
                    .push(register_segment(&mut names, fields[1], *line)?);
            }
            "E" => {
                // E <eid> <sid1><+|-> <sid2><+|-> <beg1> <end1> <beg2> <end2> <alignment>
                require_fields(&fields, 9, "Edge", *line)?;
                let (from_name, from_orient) = split_reference(fields[2], *line)?;
                let (to_name, to_orient) = split_reference(fields[3], *line)?;
                gfa.edges.push(LinkRecord {
                    from_name,
                    from_orient,
                    to_name,
                    to_orient,
                    line: *line,
                });
            }
            _ => {
                // H is read by detect_version; F, G, O, U and unknown record
                // types are not converted
            }
        }
    }

    check_references(&names, gfa.edges.iter())?;
    Ok(gfa)
}

fn require_fields(fields: &[&str], min: usize, kind: &str, line: usize) -> Result<(), GfaError> {
    if fields.len() < min {
        return Err(GfaError::Malformed {
            line,
            message: format!("{} record requires at least {} fields", kind, min),
        });
    }
    Ok(())
}

fn register_segment(
    names: &mut HashSet<String>,
    sid: &str,
    line: usize,
) -> Result<SegmentRecord, GfaError> {
    if sid.is_empty() {
        return Err(GfaError::Malformed {
            line,
            message: "Segment identifier is empty".to_string(),
        });
    }
    if !names.insert(sid.to_string()) {
        return Err(GfaError::DuplicateSegment {
            line,
            name: sid.to_string(),
        });
    }
    Ok(SegmentRecord {
        sid: sid.to_string(),
        line,
    })
}

/// GFA1 `L` and `C` share the layout `<from> <orient> <to> <orient> ...`
fn link_from_fields(fields: &[&str], line: usize) -> LinkRecord {
    LinkRecord {
        from_name: fields[1].to_string(),
        from_orient: fields[2].to_string(),
        to_name: fields[3].to_string(),
        to_orient: fields[4].to_string(),
        line,
    }
}

/// Split a GFA2 reference such as `s1+` into name and orientation sign.
fn split_reference(reference: &str, line: usize) -> Result<(String, String), GfaError> {
    let mut chars = reference.chars();
    match chars.next_back() {
        Some(sign) if !chars.as_str().is_empty() => {
            Ok((chars.as_str().to_string(), sign.to_string()))
        }
        _ => Err(GfaError::Malformed {
            line,
            message: format!("Edge reference missing segment or orientation: {}", reference),
        }),
    }
}

fn check_references<'a>(
    names: &HashSet<String>,
    links: impl Iterator<Item = &'a LinkRecord>,
) -> Result<(), GfaError> {
    for link in links {
        for name in [&link.from_name, &link.to_name] {
            if !names.contains(name.as_str()) {
                return Err(GfaError::UndefinedSegment {
                    line: link.line,
                    name: name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn parse(content: &str) -> Result<GfaDocument, GfaError> {
        GfaDocument::parse(Cursor::new(content))
    }

    #[test]
    fn test_parse_simple_gfa1() {
        let gfa_content = "H\tVN:Z:1.0\n\
                          S\ts1\tACGT\n\
                          S\ts2\tGGGG\n\
                          L\ts1\t+\ts2\t-\t2M\n\
                          P\tpath1\ts1+,s2-\t*\n";

        let doc = parse(gfa_content).unwrap();
        let GfaDocument::V1(gfa) = doc else {
            panic!("Expected GFA1 document");
        };

        assert_eq!(gfa.segment_count(), 2);
        assert_eq!(gfa.link_count(), 1);

        let link = &gfa.links[0];
        assert_eq!(link.from_name, "s1");
        assert_eq!(link.from_orient, "+");
        assert_eq!(link.to_name, "s2");
        assert_eq!(link.to_orient, "-");
        assert_eq!(link.line, 4);
    }

    #[test]
    fn test_containments_follow_links() {
        let gfa_content = "H\tVN:Z:1.0\n\
                          S\ts1\tACGTACGT\n\
                          S\ts2\tCGTA\n\
                          S\ts3\tTTTT\n\
                          C\ts1\t+\ts2\t-\t1\t4M\n\
                          L\ts1\t+\ts3\t+\t0M\n";

        let GfaDocument::V1(gfa) = parse(gfa_content).unwrap() else {
            panic!("Expected GFA1 document");
        };

        let ends: Vec<&str> = gfa.links().map(|l| l.to_name.as_str()).collect();
        assert_eq!(ends, vec!["s3", "s2"]);
        assert_eq!(gfa.link_count(), 2);
    }

    #[test]
    fn test_parse_gfa2() {
        let gfa_content = "H\tVN:Z:2.0\n\
                          S\tA\t4\tACGT\n\
                          S\tB\t4\t*\n\
                          E\te1\tA+\tB-\t2\t4$\t0\t2\t2M\n\
                          G\tg1\tA+\tB-\t100\t*\n\
                          O\tpath\tA+ B-\n";

        let doc = parse(gfa_content).unwrap();
        assert_eq!(doc.version(), GfaVersion::V2);
        let GfaDocument::V2(gfa) = doc else {
            panic!("Expected GFA2 document");
        };

        assert_eq!(gfa.segment_count(), 2);
        assert_eq!(gfa.edges.len(), 1);
        assert_eq!(gfa.edges[0].line, 3);

        let link = gfa.links().next().unwrap();
        assert_eq!(link.from_name, "A");
        assert_eq!(link.from_orient, "+");
        assert_eq!(link.to_name, "B");
        assert_eq!(link.to_orient, "-");
    }

    #[test]
    fn test_version_inferred_without_header() {
        let gfa1 = "S\ts1\tACGT\n";
        assert_eq!(parse(gfa1).unwrap().version(), GfaVersion::V1);

        let gfa2 = "S\ts1\t4\tACGT\n\
                    S\ts2\t4\tACGT\n\
                    E\t*\ts1+\ts2+\t4$\t4$\t0\t0\t0M\n";
        assert_eq!(parse(gfa2).unwrap().version(), GfaVersion::V2);
    }

    #[test]
    fn test_version_tag_must_be_string_typed() {
        // Only `VN:Z:` declares a version; other tag types fall back to inference
        let doc = parse("H\tVN:i:2\nS\ts1\tACGT\n").unwrap();
        assert_eq!(doc.version(), GfaVersion::V1);
        assert!(matches!(doc, GfaDocument::V1(ref gfa) if gfa.segments.len() == 1));

        let doc = parse("H\tVN:i:2\tVN:Z:2.0\nS\ts1\t4\tACGT\n").unwrap();
        assert_eq!(doc.version(), GfaVersion::V2);
    }

    #[test]
    fn test_unsupported_version() {
        let doc = parse("H\tVN:Z:gfa3\nS\ts1\tACGT\n").unwrap();
        assert!(matches!(doc, GfaDocument::Unsupported { ref version } if version == "gfa3"));
        assert_eq!(doc.version(), GfaVersion::Unsupported("gfa3".to_string()));
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(GfaVersion::from_tag("1.0"), GfaVersion::V1);
        assert_eq!(GfaVersion::from_tag("1.2"), GfaVersion::V1);
        assert_eq!(GfaVersion::from_tag("2.0"), GfaVersion::V2);
        assert_eq!(
            GfaVersion::from_tag("3.0"),
            GfaVersion::Unsupported("3.0".to_string())
        );
        assert_eq!(format!("{}", GfaVersion::V2), "gfa2");
    }

    #[test]
    fn test_orientation_kept_verbatim() {
        let gfa_content = "S\ts1\tACGT\n\
                          S\ts2\tGGGG\n\
                          L\ts1\t+\ts2\tx\t0M\n";
        let GfaDocument::V1(gfa) = parse(gfa_content).unwrap() else {
            panic!("Expected GFA1 document");
        };
        assert_eq!(gfa.links[0].to_orient, "x");
    }

    #[test]
    fn test_duplicate_segment() {
        let err = parse("S\ts1\tACGT\nS\ts1\tGGGG\n").unwrap_err();
        assert!(matches!(
            err,
            GfaError::DuplicateSegment { line: 2, ref name } if name == "s1"
        ));
    }

    #[test]
    fn test_undefined_segment() {
        let gfa_content = "S\ts1\tACGT\n\
                          L\ts1\t+\tmissing\t+\t0M\n";
        let err = parse(gfa_content).unwrap_err();
        assert!(matches!(
            err,
            GfaError::UndefinedSegment { line: 2, ref name } if name == "missing"
        ));
    }

    #[test]
    fn test_malformed_link() {
        let err = parse("S\ts1\tACGT\nL\ts1\t+\n").unwrap_err();
        assert!(matches!(err, GfaError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_malformed_gfa2_reference() {
        let gfa_content = "H\tVN:Z:2.0\n\
                          S\tA\t4\tACGT\n\
                          E\te1\t+\tA+\t0\t1\t0\t1\t*\n";
        let err = parse(gfa_content).unwrap_err();
        assert!(matches!(err, GfaError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let gfa_content = "# assembled by hand\n\
                          \n\
                          S\ts1\tACGT\n";
        let GfaDocument::V1(gfa) = parse(gfa_content).unwrap() else {
            panic!("Expected GFA1 document");
        };
        assert_eq!(gfa.segments[0].line, 3);
    }

    #[test]
    fn test_from_file_gz() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.gfa.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(b"H\tVN:Z:1.0\nS\ts1\tACGT\nS\ts2\tGG\nL\ts1\t+\ts2\t+\t0M\n")
            .unwrap();
        encoder.finish().unwrap();

        let GfaDocument::V1(gfa) = GfaDocument::from_file(&path).unwrap() else {
            panic!("Expected GFA1 document");
        };
        assert_eq!(gfa.segment_count(), 2);
        assert_eq!(gfa.link_count(), 1);
    }
}
