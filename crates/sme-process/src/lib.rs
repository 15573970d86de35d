//! Process trait, port binding, and run context for SME simulations.
//!
//! A process is a block of simulated logic bound to fixed input and
//! output buses. [`Setup`] declares the binding shape once, [`Process::run`]
//! executes one clock cycle of logic through a [`RunContext`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bound;
pub mod context;
pub mod error;
pub mod ports;
pub mod process;

pub use bound::BoundProcess;
pub use context::RunContext;
pub use error::{BindError, ProcessError};
pub use ports::{Direction, Ports};
pub use process::{Process, Setup};
