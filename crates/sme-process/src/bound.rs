//! A process together with its frozen port bindings.

use sme_bus::BusTable;
use sme_core::{BusId, TickId};

use crate::context::RunContext;
use crate::error::{BindError, ProcessError};
use crate::ports::Ports;
use crate::process::{Process, Setup};

/// A constructed process, ready to be clocked by a network.
///
/// Owns the process state and its [`Ports`]; neither changes after
/// construction.
pub struct BoundProcess {
    ports: Ports,
    process: Box<dyn Process>,
}

impl BoundProcess {
    /// Pair a process with bindings built by hand.
    pub fn new(ports: Ports, process: impl Process) -> Self {
        Self {
            ports,
            process: Box::new(process),
        }
    }

    /// Construct `P` through its [`Setup`] implementation.
    ///
    /// Every bus in `inputs` and `outputs` must end up bound to a field;
    /// a setup that leaves one unmapped fails with
    /// [`BindError::BusMapMismatch`].
    pub fn setup<P: Setup>(
        name: impl Into<String>,
        inputs: &[BusId],
        outputs: &[BusId],
        params: P::Params,
    ) -> Result<Self, BindError> {
        let mut ports = Ports::new(name);
        let process = P::setup(&mut ports, inputs, outputs, params)?;

        let bound = ports.inputs().count() + ports.outputs().count();
        let supplied = inputs.len() + outputs.len();
        if bound != supplied {
            return Err(BindError::BusMapMismatch {
                process: ports.process_name().to_string(),
                buses: supplied,
                fields: bound,
            });
        }
        Ok(Self::new(ports, process))
    }

    /// The process name.
    pub fn name(&self) -> &str {
        self.ports.process_name()
    }

    /// The process's bindings.
    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    /// Invoke `run` exactly `n` times, sequentially, stopping at the
    /// first error. Process state carries over between invocations.
    pub fn tick(&mut self, buses: &mut BusTable, tick: TickId, n: u32) -> Result<(), ProcessError> {
        let mut ctx = RunContext::new(&self.ports, buses, tick);
        for _ in 0..n {
            self.process.run(&mut ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BoundProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundProcess")
            .field("ports", &self.ports)
            .finish_non_exhaustive()
    }
}
