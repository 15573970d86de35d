//! Command-line options shared by SME simulation binaries.
//!
//! ```text
//! -t, --trace [FILE]   write a trace of every bus (default trace-<network>.csv)
//! -g, --graph [FILE]   write the network graph (default graph-<network>.dot)
//! -C, --outdir DIR     place output files in DIR
//! [ARGS]...            passed through to the model untouched
//! ```

use std::path::PathBuf;

use clap::Parser;
use sme_engine::{OutputToggle, RunOptions};

/// Parsed SME command-line options.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about = "SME simulation options")]
pub struct Args {
    /// Write a trace of all buses to FILE. Without FILE, uses
    /// trace-<network>.csv
    #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
    pub trace: Option<Option<PathBuf>>,

    /// Write a graph of the network to FILE. Without FILE, uses
    /// graph-<network>.dot
    #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
    pub graph: Option<Option<PathBuf>>,

    /// Save output files to DIR
    #[arg(short = 'C', long = "outdir", value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Arguments for the model itself
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub remaining: Vec<String>,
}

impl Args {
    /// Convert to engine run options.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            trace: toggle(&self.trace),
            graph: toggle(&self.graph),
            output_dir: self.outdir.clone(),
        }
    }
}

fn toggle(flag: &Option<Option<PathBuf>>) -> OutputToggle {
    match flag {
        None => OutputToggle::Disabled,
        Some(None) => OutputToggle::Default,
        Some(Some(path)) => OutputToggle::Path(path.clone()),
    }
}
