//! Graph export to DOT, GraphML and GML
//!
//! Vertices are written by insertion index with their flat key as name;
//! edges follow in insertion order, tagged with their [`EdgeKind`].

use crate::builder::{EdgeKind, StrandGraph};
use crate::error::{ConvertError, Result};
use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphFormat {
    Dot,
    GraphMl,
    Gml,
}

impl GraphFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            GraphFormat::Dot => "dot",
            GraphFormat::GraphMl => "graphml",
            GraphFormat::Gml => "gml",
        }
    }

    /// Guess the format from an output path's extension
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for GraphFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(GraphFormat::Dot),
            "graphml" => Ok(GraphFormat::GraphMl),
            "gml" => Ok(GraphFormat::Gml),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Write `graph` to a new file at `path`
pub fn write_graph<P: AsRef<Path>>(
    graph: &StrandGraph,
    path: P,
    format: GraphFormat,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_graph_to(graph, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Write `graph` to any writer
pub fn write_graph_to<W: Write>(
    graph: &StrandGraph,
    writer: &mut W,
    format: GraphFormat,
) -> Result<()> {
    match format {
        GraphFormat::Dot => write_dot(graph, writer)?,
        GraphFormat::GraphMl => write_graphml(graph, writer)?,
        GraphFormat::Gml => write_gml(graph, writer)?,
    }
    Ok(())
}

/// (source index, target index, kind) in insertion order
fn indexed_edges(graph: &StrandGraph) -> impl Iterator<Item = (usize, usize, EdgeKind)> + '_ {
    graph
        .graph()
        .edge_references()
        .map(|e| (e.source().index(), e.target().index(), *e.weight()))
}

// petgraph numbers nodes by index and walks edges in insertion order.
fn write_dot<W: Write>(graph: &StrandGraph, w: &mut W) -> std::io::Result<()> {
    let dot = Dot::with_attr_getters(
        graph.graph(),
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, edge| format!("kind = \"{}\" ", edge.weight()),
        &|_, (_, vertex)| format!("label = \"{}\" ", escape_quoted(&vertex.key())),
    );
    write!(w, "{}", dot)
}

fn write_graphml<W: Write>(graph: &StrandGraph, w: &mut W) -> std::io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;
    writeln!(
        w,
        r#"  <key id="v_name" for="node" attr.name="name" attr.type="string"/>"#
    )?;
    writeln!(
        w,
        r#"  <key id="e_kind" for="edge" attr.name="kind" attr.type="string"/>"#
    )?;
    writeln!(w, r#"  <graph id="G" edgedefault="directed">"#)?;
    for (i, vertex) in graph.vertices().enumerate() {
        writeln!(w, r#"    <node id="n{}">"#, i)?;
        writeln!(
            w,
            r#"      <data key="v_name">{}</data>"#,
            escape_xml(&vertex.key())
        )?;
        writeln!(w, "    </node>")?;
    }
    for (from, to, kind) in indexed_edges(graph) {
        writeln!(w, r#"    <edge source="n{}" target="n{}">"#, from, to)?;
        writeln!(w, r#"      <data key="e_kind">{}</data>"#, kind)?;
        writeln!(w, "    </edge>")?;
    }
    writeln!(w, "  </graph>")?;
    writeln!(w, "</graphml>")
}

fn write_gml<W: Write>(graph: &StrandGraph, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "Creator \"gfaconvert {}\"", env!("CARGO_PKG_VERSION"))?;
    writeln!(w, "graph")?;
    writeln!(w, "[")?;
    writeln!(w, "  directed 1")?;
    for (i, vertex) in graph.vertices().enumerate() {
        writeln!(w, "  node")?;
        writeln!(w, "  [")?;
        writeln!(w, "    id {}", i)?;
        // GML strings take HTML entities, not backslash escapes
        writeln!(w, "    name \"{}\"", escape_xml(&vertex.key()))?;
        writeln!(w, "  ]")?;
    }
    for (from, to, kind) in indexed_edges(graph) {
        writeln!(w, "  edge")?;
        writeln!(w, "  [")?;
        writeln!(w, "    source {}", from)?;
        writeln!(w, "    target {}", to)?;
        writeln!(w, "    kind \"{}\"", kind)?;
        writeln!(w, "  ]")?;
    }
    writeln!(w, "]")
}

fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_reader;
    use crate::observer::NoopObserver;
    use std::io::Cursor;

    fn create_test_graph() -> StrandGraph {
        let gfa_content = "H\tVN:Z:1.0\n\
                          S\tA\tACGT\n\
                          S\tB\tGGGG\n\
                          L\tA\t+\tB\t-\t0M\n";
        load_reader(Cursor::new(gfa_content), &NoopObserver).unwrap()
    }

    fn render(graph: &StrandGraph, format: GraphFormat) -> String {
        let mut buf = Vec::new();
        write_graph_to(graph, &mut buf, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("dot".parse::<GraphFormat>().unwrap(), GraphFormat::Dot);
        assert_eq!("GraphML".parse::<GraphFormat>().unwrap(), GraphFormat::GraphMl);
        assert_eq!("gml".parse::<GraphFormat>().unwrap(), GraphFormat::Gml);

        let err = "svg".parse::<GraphFormat>().unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(ref f) if f == "svg"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            GraphFormat::from_extension("out/graph.graphml"),
            Some(GraphFormat::GraphMl)
        );
        assert_eq!(GraphFormat::from_extension("graph.gml"), Some(GraphFormat::Gml));
        assert_eq!(GraphFormat::from_extension("graph.txt"), None);
        assert_eq!(GraphFormat::from_extension("graph"), None);
    }

    #[test]
    fn test_write_dot() {
        let dot = render(&create_test_graph(), GraphFormat::Dot);
        // Compare without whitespace so indentation does not matter
        let lines: Vec<String> = dot
            .lines()
            .map(|l| l.split_whitespace().collect())
            .collect();

        assert_eq!(lines[0], "digraph{");
        assert_eq!(lines[1], "0[label=\"A\"]");
        assert_eq!(lines[2], "1[label=\"_A\"]");
        assert_eq!(lines[3], "2[label=\"B\"]");
        assert_eq!(lines[4], "3[label=\"_B\"]");
        // A+ B- : (A, _B) then (B, _A), then virtual edges
        assert_eq!(lines[5], "0->3[kind=\"link\"]");
        assert_eq!(lines[6], "2->1[kind=\"complement\"]");
        assert_eq!(lines[7], "0->1[kind=\"virtual\"]");
        assert_eq!(lines[8], "2->3[kind=\"virtual\"]");
        assert_eq!(lines[9], "}");
    }

    #[test]
    fn test_write_graphml() {
        let xml = render(&create_test_graph(), GraphFormat::GraphMl);

        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<node id=").count(), 4);
        assert_eq!(xml.matches("<edge source=").count(), 4);
        assert!(xml.contains(r#"<edge source="n0" target="n3">"#));
        assert!(xml.contains(r#"<data key="v_name">_B</data>"#));
        assert!(xml.trim_end().ends_with("</graphml>"));
    }

    #[test]
    fn test_write_gml() {
        let gml = render(&create_test_graph(), GraphFormat::Gml);

        assert!(gml.contains("directed 1"));
        assert_eq!(gml.matches("  node\n").count(), 4);
        assert_eq!(gml.matches("  edge\n").count(), 4);
        assert!(gml.contains("    name \"_A\""));
        assert!(gml.contains("    source 2\n    target 1\n    kind \"complement\""));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_quoted(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_write_graph_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.gml");

        write_graph(&create_test_graph(), &path, GraphFormat::Gml).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Creator"));
    }
}
