//! Network wiring, clocking, and trace emission for SME simulations.
//!
//! A [`Network`] is built once by a user-supplied wiring closure that
//! registers buses and processes through a [`Wiring`] session. After
//! that the topology is frozen and [`Network::advance`] drives the clock:
//!
//! 1. every local bus propagates (and is sampled into the trace), in
//!    registration order;
//! 2. in foreign-driven mode, the foreign engine propagates;
//! 3. every process runs once, in registration order;
//! 4. in foreign-driven mode, the foreign engine ticks.
//!
//! Writes made in step 3 become visible in step 1 of the next tick,
//! which is the one-cycle register latency being modeled.
//!
//! [`Simulation`] wraps a network with [`RunOptions`]: it resolves output
//! paths, writes the topology graph, and runs the clock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod foreign;
pub mod graph;
pub mod network;
pub mod simulation;
pub mod wiring;

pub use config::{ConfigError, NetworkConfig, OutputToggle, RunOptions};
pub use error::{SimError, WiringError};
pub use foreign::{ForeignEngine, Mode};
pub use graph::{render_graph, write_graph, write_graph_file};
pub use network::Network;
pub use simulation::Simulation;
pub use wiring::{Registered, Registrable, Wiring};
