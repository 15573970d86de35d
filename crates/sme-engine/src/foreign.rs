//! The boundary to a foreign simulation engine.
//!
//! A network is either simulated entirely by this kernel ([`Mode::Local`])
//! or co-simulated with an engine that owns some of the buses
//! ([`Mode::ForeignDriven`]). The mode is fixed when the network is
//! wired.

use std::fmt;

use indexmap::IndexMap;
use sme_bus::ForeignChannel;
use sme_core::ForeignError;

/// An external simulation runtime that owns and clocks some buses.
///
/// The kernel calls [`propagate`](ForeignEngine::propagate) after its own
/// buses have propagated and [`tick`](ForeignEngine::tick) after every
/// process has run, once per clock cycle.
pub trait ForeignEngine: Send {
    /// Export the channels of the engine's bus called `name`.
    fn bus(&mut self, name: &str) -> Result<IndexMap<String, Box<dyn ForeignChannel>>, ForeignError>;

    /// Propagate the engine's buses for the current cycle.
    fn propagate(&mut self) -> Result<(), ForeignError>;

    /// Run the engine's own processes for the current cycle.
    fn tick(&mut self) -> Result<(), ForeignError>;

    /// Flush engine state (its own traces, for instance) after the run.
    fn finalize(&mut self) -> Result<(), ForeignError>;
}

/// How a network is clocked.
#[derive(Default)]
pub enum Mode {
    /// Pure in-kernel simulation.
    #[default]
    Local,
    /// Co-simulation with a foreign engine.
    ForeignDriven(Box<dyn ForeignEngine>),
}

impl Mode {
    /// Whether a foreign engine is attached.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::ForeignDriven(_))
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::ForeignDriven(_) => "foreign-driven",
        }
    }

    /// The attached engine, if any.
    pub fn engine_mut(&mut self) -> Option<&mut (dyn ForeignEngine + 'static)> {
        match self {
            Self::Local => None,
            Self::ForeignDriven(engine) => Some(engine.as_mut()),
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
