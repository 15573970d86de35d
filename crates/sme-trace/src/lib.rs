//! Trace recording and emission for SME simulations.
//!
//! A trace is the column-ordered time series of committed channel values:
//! one column per traced channel, one row per elapsed clock tick.
//!
//! # Architecture
//!
//! - [`TraceTable`] accumulates samples in column registration order
//! - [`TraceWriter`] emits a table as CSV to any `Write` sink
//! - [`TraceReader`] parses CSV back into a table
//! - [`compare_traces`] reports divergences between two tables
//!
//! # Format
//!
//! ```text
//! Net_bus_a,Net_bus_b        <- column names, sorted lexicographically
//! U,U                        <- row 1: state after the first propagate
//! 1,0                        <- row 2 ...
//! ```
//!
//! Undriven channels are written as `U`; everything else is a base-10
//! integer (booleans as `0`/`1`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod reader;
pub mod table;
pub mod writer;

pub use compare::{compare_traces, Divergence};
pub use error::TraceError;
pub use reader::TraceReader;
pub use table::{column_name, ColumnId, Sample, TraceTable};
pub use writer::{write_trace_file, TraceWriter};

/// Token written for a channel with no committed value.
pub const UNDEFINED_TOKEN: &str = "U";
