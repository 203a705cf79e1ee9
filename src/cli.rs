//! Command-line interface for gfaconvert

use crate::export::{write_graph, GraphFormat};
use crate::gfa::GfaVersion;
use crate::load::load;
use crate::observer::{Checkpoint, ConversionObserver, TracingObserver};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// gfaconvert - convert GFA data to more portable graph formats
#[derive(Parser, Debug)]
#[command(name = "gfaconvert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input GFA file (GFA 1 or GFA 2, optionally gzipped)
    #[arg(value_name = "GFAFILE")]
    pub gfafile: PathBuf,

    /// Output file path (defaults to the input path with the format's extension)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output format: dot, graphml or gml (defaults to the output extension, then dot)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the conversion summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What a finished conversion produced
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: GraphFormat,
    pub version: Option<GfaVersion>,
    pub segments: usize,
    pub links: usize,
    pub vertices: usize,
    pub edges: usize,
    pub elapsed_ms: u128,
}

impl ConversionSummary {
    /// Format the summary as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str("=== Conversion Summary ===\n\n");
        output.push_str(&format!("Input:            {}\n", self.input.display()));
        output.push_str(&format!("Output:           {}\n", self.output.display()));
        output.push_str(&format!("Format:           {}\n", self.format));
        if let Some(ref version) = self.version {
            output.push_str(&format!("GFA version:      {}\n", version));
        }
        output.push_str(&format!("Segments:         {:>12}\n", self.segments));
        output.push_str(&format!("Links:            {:>12}\n", self.links));
        output.push_str(&format!("Strand vertices:  {:>12}\n", self.vertices));
        output.push_str(&format!("Edges:            {:>12}\n", self.edges));
        output
    }
}

/// Drives the spinner and remembers what it was told
struct CliObserver {
    spinner: Option<ProgressBar>,
    parsed: RefCell<Option<Checkpoint>>,
}

impl CliObserver {
    fn new(quiet: bool) -> Self {
        Self {
            spinner: (!quiet).then(|| create_spinner("Reading GFA file...")),
            parsed: RefCell::new(None),
        }
    }

    fn set_message(&self, message: String) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(message);
        }
    }

    fn finish(&self, message: String) {
        if let Some(ref pb) = self.spinner {
            pb.finish_with_message(message);
        }
    }

    fn abandon(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl ConversionObserver for CliObserver {
    fn checkpoint(&self, checkpoint: &Checkpoint) {
        TracingObserver.checkpoint(checkpoint);
        match checkpoint {
            Checkpoint::Parsed { segments, links, .. } => {
                self.set_message(format!(
                    "Building strand graph from {} segments and {} links...",
                    segments, links
                ));
                *self.parsed.borrow_mut() = Some(checkpoint.clone());
            }
            Checkpoint::Built { vertices, edges } => {
                self.set_message(format!(
                    "Writing {} vertices and {} edges...",
                    vertices, edges
                ));
            }
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Set up `tracing` on stderr; `RUST_LOG` overrides the `-v` level.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second initialisation (e.g. in tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Pick the output format and path from the arguments.
///
/// An explicit `--format` wins, then the `--out` extension, then DOT. Without
/// `--out` the input path gets the format's extension.
pub fn resolve_output(
    input: &Path,
    out: Option<&Path>,
    format: Option<&str>,
) -> crate::Result<(PathBuf, GraphFormat)> {
    let format = match format {
        Some(name) => name.parse()?,
        None => out
            .and_then(GraphFormat::from_extension)
            .unwrap_or(GraphFormat::Dot),
    };

    let path = match out {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(format.extension()),
    };

    Ok((path, format))
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let summary = execute(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.format_summary());
        println!("Graph written to: {}", summary.output.display());
    }

    Ok(())
}

/// Convert one file as described by `cli`
pub fn execute(cli: &Cli) -> Result<ConversionSummary> {
    let (output, format) =
        resolve_output(&cli.gfafile, cli.out.as_deref(), cli.format.as_deref())?;

    let observer = CliObserver::new(cli.quiet);
    let start = Instant::now();

    let graph = match load(&cli.gfafile, &observer) {
        Ok(graph) => graph,
        Err(e) => {
            observer.abandon();
            return Err(e).with_context(|| format!("converting {}", cli.gfafile.display()));
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                observer.abandon();
                return Err(e).with_context(|| format!("creating directory {}", parent.display()));
            }
        }
    }

    if let Err(e) = write_graph(&graph, &output, format) {
        observer.abandon();
        return Err(e).with_context(|| format!("writing {}", output.display()));
    }

    let elapsed = start.elapsed();
    observer.finish(format!("Done in {:.2?}", elapsed));

    let (version, segments, links) = match observer.parsed.into_inner() {
        Some(Checkpoint::Parsed {
            version,
            segments,
            links,
        }) => (Some(version), segments, links),
        _ => (None, 0, 0),
    };

    Ok(ConversionSummary {
        input: cli.gfafile.clone(),
        output,
        format,
        version,
        segments,
        links,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        elapsed_ms: elapsed.as_millis(),
    })
}
