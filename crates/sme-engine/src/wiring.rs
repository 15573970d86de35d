//! The one-time wiring session that builds a network's topology.

use sme_bus::{Bus, BusEntry, BusTable, ExternalBus};
use sme_core::{BusId, ProcessId};
use sme_process::{BoundProcess, Setup};
use sme_trace::TraceTable;
use tracing::debug;

use crate::error::WiringError;
use crate::foreign::Mode;

/// Anything that can be registered with a network.
#[derive(Debug)]
pub enum Registrable {
    /// A kernel-propagated bus.
    Bus(Bus),
    /// A bus owned by the foreign engine.
    ExternalBus(ExternalBus),
    /// A constructed process.
    Process(BoundProcess),
}

impl From<Bus> for Registrable {
    fn from(bus: Bus) -> Self {
        Self::Bus(bus)
    }
}

impl From<ExternalBus> for Registrable {
    fn from(bus: ExternalBus) -> Self {
        Self::ExternalBus(bus)
    }
}

impl From<BoundProcess> for Registrable {
    fn from(process: BoundProcess) -> Self {
        Self::Process(process)
    }
}

/// Handle issued for a registered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registered {
    /// A bus (local or external).
    Bus(BusId),
    /// A process.
    Process(ProcessId),
}

/// A wiring session, handed to the closure passed to
/// [`Network::wire`](crate::Network::wire).
///
/// Buses and processes are appended in call order; that order is the
/// order they are propagated and run in on every tick.
#[derive(Debug)]
pub struct Wiring {
    network: String,
    mode: Mode,
    buses: BusTable,
    processes: Vec<BoundProcess>,
    trace: Option<TraceTable>,
}

impl Wiring {
    pub(crate) fn new(network: String, mode: Mode, tracing: bool) -> Self {
        Self {
            network,
            mode,
            buses: BusTable::new(),
            processes: Vec::new(),
            trace: tracing.then(TraceTable::new),
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (String, Mode, BusTable, Vec<BoundProcess>, Option<TraceTable>) {
        (
            self.network,
            self.mode,
            self.buses,
            self.processes,
            self.trace,
        )
    }

    /// Name of the network being wired.
    pub fn network_name(&self) -> &str {
        &self.network
    }

    /// Handle of an already registered bus.
    pub fn bus_id(&self, name: &str) -> Option<BusId> {
        self.buses.find(name)
    }

    /// Register a bus or process.
    ///
    /// A local bus is attached to this network and, when tracing is on,
    /// gets its trace columns immediately. An external bus has its
    /// channels exported by the foreign engine. A process is checked to
    /// reference only buses registered here.
    pub fn register(&mut self, item: impl Into<Registrable>) -> Result<Registered, WiringError> {
        match item.into() {
            Registrable::Bus(bus) => self.register_bus(bus).map(Registered::Bus),
            Registrable::ExternalBus(bus) => self.register_external(bus).map(Registered::Bus),
            Registrable::Process(p) => self.register_process(p).map(Registered::Process),
        }
    }

    /// Declare and register an untyped bus.
    pub fn bus<I, S>(&mut self, name: impl Into<String>, channels: I) -> Result<BusId, WiringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_bus(Bus::new(name, channels))
    }

    /// Declare and register a bus of typed channels.
    pub fn typed_bus<'a, I>(&mut self, name: impl Into<String>, channels: I) -> Result<BusId, WiringError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let bus = Bus::typed(name, channels)?;
        self.register_bus(bus)
    }

    /// Declare and register a bus owned by the foreign engine.
    pub fn external_bus(&mut self, name: impl Into<String>) -> Result<BusId, WiringError> {
        self.register_external(ExternalBus::new(name))
    }

    /// Construct `P` on the given buses and register it.
    pub fn process<P: Setup>(
        &mut self,
        name: impl Into<String>,
        inputs: &[BusId],
        outputs: &[BusId],
        params: P::Params,
    ) -> Result<ProcessId, WiringError> {
        let process = BoundProcess::setup::<P>(name, inputs, outputs, params)?;
        self.register_process(process)
    }

    fn check_unique(&self, name: &str) -> Result<(), WiringError> {
        match self.buses.find(name) {
            Some(_) => Err(WiringError::DuplicateBus {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn register_bus(&mut self, mut bus: Bus) -> Result<BusId, WiringError> {
        self.check_unique(bus.name())?;
        bus.attach_to(&self.network);
        if let Some(table) = self.trace.as_mut() {
            let taken = bus
                .channel_names()
                .map(|ch| bus.trace_column(ch))
                .find(|column| table.column_id(column).is_some());
            if let Some(column) = taken {
                return Err(WiringError::DuplicateColumn { column });
            }
            bus.enable_trace(table);
        }
        debug!(network = %self.network, bus = bus.name(), "registered bus");
        Ok(self.buses.push(BusEntry::Local(bus)))
    }

    fn register_external(&mut self, mut bus: ExternalBus) -> Result<BusId, WiringError> {
        self.check_unique(bus.name())?;
        let Some(engine) = self.mode.engine_mut() else {
            return Err(WiringError::ExternalBusWithoutEngine {
                bus: bus.name().to_string(),
            });
        };
        let channels = engine.bus(bus.name()).map_err(|source| WiringError::Foreign {
            bus: bus.name().to_string(),
            source,
        })?;
        bus.bind(channels);
        debug!(network = %self.network, bus = bus.name(), "registered external bus");
        Ok(self.buses.push(BusEntry::External(bus)))
    }

    fn register_process(&mut self, process: BoundProcess) -> Result<ProcessId, WiringError> {
        let ports = process.ports();
        let stray = ports
            .inputs()
            .chain(ports.outputs())
            .map(|(_, bus)| bus)
            .find(|&bus| !self.buses.contains(bus));
        if let Some(bus) = stray {
            return Err(WiringError::UnknownBus {
                process: process.name().to_string(),
                bus,
            });
        }

        let id = ProcessId(self.processes.len() as u32);
        debug!(network = %self.network, process = process.name(), "registered process");
        self.processes.push(process);
        Ok(id)
    }
}
