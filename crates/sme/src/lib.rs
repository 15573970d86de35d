//! SME: a cycle-accurate, two-phase simulation kernel for synchronous
//! hardware networks.
//!
//! This is the facade crate that re-exports the public API of the SME
//! sub-crates. For most users, adding `sme` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sme::prelude::*;
//!
//! /// Drives `out.value` with 0, 1, 0, 1, ...
//! struct Toggle(bool);
//!
//! impl Process for Toggle {
//!     fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
//!         ctx.write("out", "value", self.0)?;
//!         self.0 = !self.0;
//!         Ok(())
//!     }
//! }
//!
//! impl Setup for Toggle {
//!     type Params = ();
//!
//!     fn setup(
//!         ports: &mut Ports,
//!         _inputs: &[BusId],
//!         outputs: &[BusId],
//!         _: (),
//!     ) -> Result<Self, BindError> {
//!         ports.map_outputs(outputs, &["out"])?;
//!         Ok(Toggle(false))
//!     }
//! }
//!
//! let mut net = Network::wire("N", NetworkConfig::traced(), Mode::Local, |w| {
//!     let out = w.bus("out", ["value"])?;
//!     w.process::<Toggle>("toggle", &[], &[out], ())?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! net.advance(4).unwrap();
//! let column: Vec<String> = net.trace().unwrap().column("N_out_value").unwrap()
//!     .iter().map(|s| s.to_string()).collect();
//! assert_eq!(column, ["U", "0", "1", "0"]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sme-core` | IDs, values, type descriptors, protocol errors |
//! | [`trace`] | `sme-trace` | Trace table, CSV writer/reader, trace comparison |
//! | [`bus`] | `sme-bus` | Channels, buses, external buses |
//! | [`process`] | `sme-process` | `Process`/`Setup` traits, ports, run context |
//! | [`engine`] | `sme-engine` | Wiring, network clock, simulation driver |
//! | [`cli`] | | Command-line options → [`engine::RunOptions`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cli;

/// Core types, values, and the protocol error taxonomy (`sme-core`).
pub use sme_core as types;

/// Trace recording, emission, and comparison (`sme-trace`).
///
/// Use [`trace::TraceReader`] and [`trace::compare_traces`] to check a
/// run against a recorded reference trace.
pub use sme_trace as trace;

/// Double-buffered channels and buses (`sme-bus`).
pub use sme_bus as bus;

/// Process trait, port binding, and run context (`sme-process`).
///
/// [`process::Process`] is the main extension point for user-defined
/// hardware logic.
pub use sme_process as process;

/// Network wiring and clocking (`sme-engine`).
///
/// [`engine::Network`] for direct control of the clock,
/// [`engine::Simulation`] for option-driven runs with file output.
pub use sme_engine as engine;

/// Common imports for typical SME usage.
///
/// ```rust
/// use sme::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use sme_core::{BusId, ProcessId, TickId, TypeKind, Value};

    // Errors
    pub use sme_core::{ChannelError, ProtocolError};
    pub use sme_engine::{SimError, WiringError};
    pub use sme_process::{BindError, ProcessError};

    // Buses
    pub use sme_bus::{Bus, ExternalBus, ForeignChannel};

    // Processes
    pub use sme_process::{Ports, Process, RunContext, Setup};

    // Engine
    pub use sme_engine::{
        ForeignEngine, Mode, Network, NetworkConfig, OutputToggle, RunOptions, Simulation, Wiring,
    };

    // Trace
    pub use sme_trace::{Sample, TraceTable};
}
