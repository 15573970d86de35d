//! Wiring-time and run-time errors of a network.

use std::io;
use std::path::PathBuf;

use sme_core::{BusId, ForeignError, TickId, TypeError};
use sme_process::{BindError, ProcessError};
use sme_trace::TraceError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while a network is being wired.
///
/// All are configuration errors: they surface before any tick runs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WiringError {
    /// The network configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A bus was declared with an invalid type tag.
    #[error(transparent)]
    Type(#[from] TypeError),
    /// A process could not bind its buses.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// Two buses share a name, which would collide in the trace.
    #[error("bus '{name}' is already registered")]
    DuplicateBus {
        /// The repeated name.
        name: String,
    },
    /// A channel's trace column is already claimed by another bus.
    ///
    /// Bus and channel names are joined with `_`, so bus `a_b` with
    /// channel `c` and bus `a` with channel `b_c` both trace as `N_a_b_c`.
    #[error("trace column '{column}' is already claimed by another channel")]
    DuplicateColumn {
        /// The colliding column name.
        column: String,
    },
    /// A process is bound to a handle not issued by this network.
    #[error("process '{process}' is bound to unknown bus {bus}")]
    UnknownBus {
        /// The offending process.
        process: String,
        /// The foreign handle.
        bus: BusId,
    },
    /// An external bus was registered on a locally simulated network.
    #[error("external bus '{bus}' requires a foreign-driven network")]
    ExternalBusWithoutEngine {
        /// The external bus.
        bus: String,
    },
    /// The foreign engine could not export a bus.
    #[error("external bus '{bus}': {source}")]
    Foreign {
        /// The external bus.
        bus: String,
        /// The engine's report.
        #[source]
        source: ForeignError,
    },
}

/// Errors raised while a network runs.
///
/// A [`Process`](SimError::Process) or [`Foreign`](SimError::Foreign)
/// error aborts the tick in progress and poisons the network.
#[derive(Debug, Error)]
pub enum SimError {
    /// Wiring failed.
    #[error(transparent)]
    Wiring(#[from] WiringError),
    /// A process violated the protocol or failed.
    #[error("tick {tick}, process '{process}': {source}")]
    Process {
        /// The failing process.
        process: String,
        /// The aborted tick.
        tick: TickId,
        /// What went wrong.
        #[source]
        source: ProcessError,
    },
    /// The foreign engine failed to propagate or tick.
    #[error("tick {tick}: {source}")]
    Foreign {
        /// The aborted tick.
        tick: TickId,
        /// The engine's report.
        #[source]
        source: ForeignError,
    },
    /// The trace could not be written.
    #[error("writing trace {}: {source}", path.display())]
    Trace {
        /// Destination file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: TraceError,
    },
    /// The topology graph could not be written.
    #[error("writing graph {}: {source}", path.display())]
    Graph {
        /// Destination file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: io::Error,
    },
    /// A previous tick aborted; the network cannot be resumed.
    #[error("network '{network}' aborted at an earlier tick and cannot be resumed")]
    Poisoned {
        /// The poisoned network.
        network: String,
    },
    /// [`Simulation::run`](crate::Simulation::run) was called before a
    /// network was set.
    #[error("no network has been set on the simulation")]
    NoNetwork,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sme_core::{ChannelError, ProtocolError};

    #[test]
    fn process_error_names_tick_and_cause() {
        let err = SimError::Process {
            process: "p".into(),
            tick: TickId(3),
            source: ProcessError::Protocol(ProtocolError::Channel {
                bus: "b".into(),
                channel: "c".into(),
                source: ChannelError::UndrivenRead,
            }),
        };
        assert_eq!(err.to_string(), "tick 3, process 'p': b.c: read of undriven channel");
    }

    #[test]
    fn wiring_errors_convert() {
        let err: SimError = WiringError::DuplicateBus { name: "b".into() }.into();
        assert_eq!(err.to_string(), "bus 'b' is already registered");
    }
}
