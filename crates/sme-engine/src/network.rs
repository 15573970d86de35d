//! The network: frozen topology plus the clock loop.
//!
//! # Tick sequence
//!
//! Each call to [`Network::advance`] runs `cycles` ticks. One tick is:
//!
//! 1. propagate every local bus in registration order, appending one
//!    trace sample per channel when tracing is on;
//! 2. foreign-driven mode only: `engine.propagate()`;
//! 3. run every process once in registration order;
//! 4. foreign-driven mode only: `engine.tick()`.
//!
//! Buses always propagate before any process runs, so no process can
//! observe a value written in the same tick.
//!
//! # Failure
//!
//! Any error in steps 2 to 4 aborts the tick and poisons the network: later
//! calls to `advance` return [`SimError::Poisoned`]. Nothing is written
//! to the trace file for an aborted `advance`.

use std::path::Path;

use sme_bus::{BusEntry, BusTable};
use sme_core::TickId;
use sme_process::BoundProcess;
use sme_trace::{write_trace_file, TraceTable};
use tracing::{debug, error, info, instrument, trace};

use crate::config::NetworkConfig;
use crate::error::{SimError, WiringError};
use crate::foreign::Mode;
use crate::wiring::Wiring;

/// A wired network of buses and processes.
///
/// Created by [`wire`](Network::wire); the set and order of buses and
/// processes never change afterwards.
pub struct Network {
    name: String,
    mode: Mode,
    config: NetworkConfig,
    buses: BusTable,
    processes: Vec<BoundProcess>,
    trace: Option<TraceTable>,
    current_tick: TickId,
    poisoned: bool,
}

// Compile-time assertion: a network can be moved to another thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Network>();
    }
};

impl Network {
    /// Validate `config`, then build the topology by running `wire` once.
    ///
    /// # Examples
    ///
    /// ```
    /// use sme_engine::{Mode, Network, NetworkConfig};
    ///
    /// let net = Network::wire("top", NetworkConfig::traced(), Mode::Local, |w| {
    ///     w.bus("data", ["valid", "value"])?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(net.bus_names().collect::<Vec<_>>(), vec!["data"]);
    /// ```
    pub fn wire<F>(
        name: impl Into<String>,
        config: NetworkConfig,
        mode: Mode,
        wire: F,
    ) -> Result<Self, WiringError>
    where
        F: FnOnce(&mut Wiring) -> Result<(), WiringError>,
    {
        let name = name.into();
        config.validate(&name, &mode)?;

        let mut wiring = Wiring::new(name, mode, config.tracing);
        wire(&mut wiring)?;
        let (name, mode, buses, processes, trace) = wiring.into_parts();

        info!(
            network = %name,
            mode = mode.name(),
            buses = buses.len(),
            processes = processes.len(),
            tracing = config.tracing,
            "network wired"
        );
        Ok(Self {
            name,
            mode,
            config,
            buses,
            processes,
            trace,
            current_tick: TickId::default(),
            poisoned: false,
        })
    }

    /// Run `cycles` clock ticks, then rewrite the trace file if one is
    /// configured.
    ///
    /// # Errors
    ///
    /// The first process or foreign-engine failure aborts the tick in
    /// progress and poisons the network. Trace file errors are reported
    /// without poisoning.
    #[instrument(skip(self), fields(network = %self.name))]
    pub fn advance(&mut self, cycles: u64) -> Result<(), SimError> {
        if self.poisoned {
            return Err(SimError::Poisoned {
                network: self.name.clone(),
            });
        }
        debug!(from = %self.current_tick, cycles, "advancing");

        for _ in 0..cycles {
            if let Err(e) = self.step() {
                self.poisoned = true;
                error!(error = %e, "tick aborted");
                return Err(e);
            }
        }

        if let (Some(table), Some(path)) = (&self.trace, &self.config.trace_path) {
            let rows = write_trace_file(path, table).map_err(|source| SimError::Trace {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), rows, "trace written");
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), SimError> {
        let tick = self.current_tick.next();

        // 1. Propagate local buses (and sample them).
        self.buses.tick_local(self.trace.as_mut());

        // 2. Foreign buses propagate after ours.
        if let Some(engine) = self.mode.engine_mut() {
            engine
                .propagate()
                .map_err(|source| SimError::Foreign { tick, source })?;
        }

        // 3. Run processes against the values just committed.
        for process in &mut self.processes {
            process
                .tick(&mut self.buses, tick, 1)
                .map_err(|source| SimError::Process {
                    process: process.name().to_string(),
                    tick,
                    source,
                })?;
        }

        // 4. Let the foreign engine run its own logic.
        if let Some(engine) = self.mode.engine_mut() {
            engine
                .tick()
                .map_err(|source| SimError::Foreign { tick, source })?;
        }

        self.current_tick = tick;
        trace!(tick = tick.0, "tick complete");
        Ok(())
    }

    /// End the run: finalize the foreign engine, if any, and hand back
    /// the recorded trace.
    pub fn finish(mut self) -> Result<Option<TraceTable>, SimError> {
        if let Some(engine) = self.mode.engine_mut() {
            engine.finalize().map_err(|source| SimError::Foreign {
                tick: self.current_tick,
                source,
            })?;
        }
        info!(network = %self.name, ticks = self.current_tick.0, "network finished");
        Ok(self.trace)
    }

    /// Write the trace recorded so far to `path`, independent of the
    /// configured trace path.
    pub fn write_trace(&self, path: &Path) -> Result<usize, SimError> {
        let Some(table) = &self.trace else {
            return Ok(0);
        };
        write_trace_file(path, table).map_err(|source| SimError::Trace {
            path: path.to_path_buf(),
            source,
        })
    }

    // ── Introspection ──────────────────────────────────────────────

    /// The network name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed ticks.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Whether an earlier tick aborted.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// The resolved configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// `"local"` or `"foreign-driven"`.
    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// The trace table, when tracing is enabled.
    pub fn trace(&self) -> Option<&TraceTable> {
        self.trace.as_ref()
    }

    /// Look up a bus by name.
    pub fn bus(&self, name: &str) -> Option<&BusEntry> {
        self.buses.find(name).and_then(|id| self.buses.get(id))
    }

    /// All buses, in registration order.
    pub fn buses(&self) -> &BusTable {
        &self.buses
    }

    /// All processes, in registration order.
    pub fn processes(&self) -> &[BoundProcess] {
        &self.processes
    }

    /// Bus names in registration order.
    pub fn bus_names(&self) -> impl Iterator<Item = &str> {
        self.buses.iter().map(|(_, bus)| bus.name())
    }

    /// Process names in registration order.
    pub fn process_names(&self) -> impl Iterator<Item = &str> {
        self.processes.iter().map(BoundProcess::name)
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("buses", &self.buses.len())
            .field("processes", &self.processes.len())
            .field("current_tick", &self.current_tick)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sme_core::{BusId, Value};
    use sme_process::{BindError, Ports, Process, ProcessError, RunContext, Setup};
    use sme_trace::Sample;

    /// Copies `input.v` to `output.v`, or drives `seed` when the input
    /// is undriven.
    struct Relay {
        seed: i64,
    }

    impl Process for Relay {
        fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
            let v = match ctx.read("input", "v") {
                Ok(v) => v,
                Err(ProcessError::Protocol(e)) if e.is_undriven_read() => Value::from(self.seed),
                Err(e) => return Err(e),
            };
            ctx.write("output", "v", v)
        }
    }

    impl Setup for Relay {
        type Params = i64;

        fn setup(
            ports: &mut Ports,
            inputs: &[BusId],
            outputs: &[BusId],
            seed: i64,
        ) -> Result<Self, BindError> {
            ports.map_inputs(inputs, &["input"])?;
            ports.map_outputs(outputs, &["output"])?;
            Ok(Self { seed })
        }
    }

    fn chain() -> Network {
        Network::wire("n", NetworkConfig::traced(), Mode::Local, |w| {
            let a = w.bus("a", ["v"])?;
            let b = w.bus("b", ["v"])?;
            w.process::<Relay>("first", &[b], &[a], 5)?;
            w.process::<Relay>("second", &[a], &[b], 9)?;
            Ok(())
        })
        .unwrap()
    }

    fn column(net: &Network, name: &str) -> Vec<String> {
        net.trace()
            .unwrap()
            .column(name)
            .unwrap()
            .iter()
            .map(Sample::to_string)
            .collect()
    }

    #[test]
    fn each_hop_costs_one_tick() {
        let mut net = chain();
        net.advance(4).unwrap();
        assert_eq!(net.current_tick(), TickId(4));
        assert_eq!(column(&net, "n_a_v"), ["U", "5", "9", "5"]);
        assert_eq!(column(&net, "n_b_v"), ["U", "9", "5", "9"]);
    }

    #[test]
    fn advance_in_pieces_matches_one_call() {
        let mut whole = chain();
        whole.advance(6).unwrap();
        let mut pieces = chain();
        pieces.advance(2).unwrap();
        pieces.advance(0).unwrap();
        pieces.advance(4).unwrap();
        assert_eq!(whole.trace(), pieces.trace());
    }

    #[test]
    fn introspection_reports_registration_order() {
        let net = chain();
        assert_eq!(net.bus_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(net.process_names().collect::<Vec<_>>(), ["first", "second"]);
        assert_eq!(net.mode_name(), "local");
        assert!(net.bus("b").is_some());
        assert!(net.bus("c").is_none());
    }

    #[test]
    fn untraced_network_has_no_table() {
        let mut net = Network::wire("n", NetworkConfig::default(), Mode::Local, |w| {
            w.bus("a", ["v"])?;
            Ok(())
        })
        .unwrap();
        net.advance(3).unwrap();
        assert!(net.trace().is_none());
        assert_eq!(net.finish().unwrap(), None);
    }

    #[test]
    fn wiring_errors_abort_construction() {
        let err = Network::wire("n", NetworkConfig::default(), Mode::Local, |w| {
            w.bus("a", ["v"])?;
            w.bus("a", ["v"])?;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err, WiringError::DuplicateBus { name: "a".into() });
    }
}
