//! Execution context passed to processes during a tick.

use sme_bus::BusTable;
use sme_core::{BusId, TickId, Value};

use crate::error::ProcessError;
use crate::ports::{Direction, Ports};

/// Execution context passed to each process's `run()` method.
///
/// Resolves the process's field names to buses through its [`Ports`] and
/// enforces direction: input fields can only be read, output fields can
/// only be written.
pub struct RunContext<'a> {
    ports: &'a Ports,
    buses: &'a mut BusTable,
    tick: TickId,
}

impl<'a> RunContext<'a> {
    /// Construct a context.
    ///
    /// Typically called by the network, not by processes directly.
    pub fn new(ports: &'a Ports, buses: &'a mut BusTable, tick: TickId) -> Self {
        Self { ports, buses, tick }
    }

    /// The tick being executed (1 for the first tick).
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Name of the running process.
    pub fn process_name(&self) -> &str {
        self.ports.process_name()
    }

    /// Read `channel` of the bus bound to input field `field`.
    pub fn read(&self, field: &str, channel: &str) -> Result<Value, ProcessError> {
        let id = self.resolve(field, Direction::Input)?;
        let bus = self.buses.get(id).ok_or_else(|| self.dangling(id))?;
        Ok(bus.get(channel)?)
    }

    /// Drive `channel` of the bus bound to output field `field`.
    pub fn write(
        &mut self,
        field: &str,
        channel: &str,
        value: impl Into<Value>,
    ) -> Result<(), ProcessError> {
        let id = self.resolve(field, Direction::Output)?;
        let process = self.ports.process_name();
        let bus = self
            .buses
            .get_mut(id)
            .ok_or_else(|| ProcessError::DanglingBus {
                process: process.to_string(),
                bus: id,
            })?;
        Ok(bus.set(channel, value.into())?)
    }

    /// Build a [`ProcessError::Failed`] for this process.
    pub fn fail(&self, reason: impl Into<String>) -> ProcessError {
        ProcessError::Failed {
            process: self.process_name().to_string(),
            reason: reason.into(),
        }
    }

    fn resolve(&self, field: &str, wanted: Direction) -> Result<BusId, ProcessError> {
        let bound = match wanted {
            Direction::Input => self.ports.input(field),
            Direction::Output => self.ports.output(field),
        };
        if let Some(id) = bound {
            return Ok(id);
        }

        let process = self.process_name().to_string();
        let actual = self.ports.direction(field);
        let field = field.to_string();
        Err(match actual {
            Some(Direction::Output) => ProcessError::NotAnInput { process, field },
            Some(Direction::Input) => ProcessError::NotAnOutput { process, field },
            None => ProcessError::UnboundField { process, field },
        })
    }

    fn dangling(&self, bus: BusId) -> ProcessError {
        ProcessError::DanglingBus {
            process: self.process_name().to_string(),
            bus,
        }
    }
}
