//! gfaconvert CLI
//!
//! Converts a GFA file into a DOT, GraphML or GML strand graph.

use gfaconvert::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
