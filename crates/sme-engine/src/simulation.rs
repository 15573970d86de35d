//! Top-level driver: options in, wired network, clock, outputs.

use sme_trace::TraceTable;
use tracing::{info, instrument};

use crate::config::RunOptions;
use crate::error::{SimError, WiringError};
use crate::foreign::Mode;
use crate::graph::write_graph_file;
use crate::network::Network;
use crate::wiring::Wiring;

/// Runs one top-level network under a set of [`RunOptions`].
///
/// ```no_run
/// use sme_engine::{Mode, RunOptions, Simulation};
///
/// let mut sim = Simulation::new(RunOptions::default());
/// sim.set_network("top", Mode::Local, |w| {
///     w.bus("data", ["value"])?;
///     Ok(())
/// })?;
/// sim.run(100)?;
/// sim.finish()?;
/// # Ok::<(), sme_engine::SimError>(())
/// ```
#[derive(Debug, Default)]
pub struct Simulation {
    options: RunOptions,
    network: Option<Network>,
}

impl Simulation {
    /// A simulation with no network yet.
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            network: None,
        }
    }

    /// The run options.
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Wire the top-level network under the run options and write its
    /// topology graph if requested.
    ///
    /// A previously set network is [finished](Network::finish) before it
    /// is replaced, so its foreign engine is finalized. Its trace table is
    /// discarded; the trace file, if configured, is already up to date.
    pub fn set_network<F>(
        &mut self,
        name: impl Into<String>,
        mode: Mode,
        wire: F,
    ) -> Result<&mut Network, SimError>
    where
        F: FnOnce(&mut Wiring) -> Result<(), WiringError>,
    {
        let name = name.into();
        let config = self.options.network_config(&name);
        let graph_path = config.graph_path.clone();
        let network = Network::wire(name, config, mode, wire)?;

        if let Some(path) = graph_path {
            write_graph_file(&network, &path).map_err(|source| SimError::Graph {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "graph written");
        }
        if let Some(previous) = self.network.take() {
            info!(network = previous.name(), "replacing network");
            previous.finish()?;
        }
        Ok(self.network.insert(network))
    }

    /// The top-level network, once set.
    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    /// Advance the top-level network by `cycles` ticks.
    #[instrument(skip(self))]
    pub fn run(&mut self, cycles: u64) -> Result<(), SimError> {
        let network = self.network.as_mut().ok_or(SimError::NoNetwork)?;
        network.advance(cycles)
    }

    /// Finish the top-level network and return its trace, if any.
    pub fn finish(self) -> Result<Option<TraceTable>, SimError> {
        match self.network {
            Some(network) => network.finish(),
            None => Err(SimError::NoNetwork),
        }
    }
}
