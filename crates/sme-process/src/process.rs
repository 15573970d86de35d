//! The [`Process`] and [`Setup`] traits.

use sme_core::BusId;

use crate::context::RunContext;
use crate::error::{BindError, ProcessError};
use crate::ports::Ports;

/// A unit of simulated logic executed once per clock tick.
///
/// # Contract
///
/// - `run()` reads the values committed at the start of the tick and
///   drives each output channel it owns at most once.
/// - Writes are not visible to any reader, including this process,
///   until the next tick.
/// - Process-local state persists across calls; the kernel never resets
///   it.
///
/// # Object safety
///
/// This trait is object-safe; the network stores processes as
/// `Box<dyn Process>`.
///
/// # Examples
///
/// A one-bit toggle with no inputs:
///
/// ```
/// use sme_process::{Process, ProcessError, RunContext};
///
/// struct Toggle {
///     state: bool,
/// }
///
/// impl Process for Toggle {
///     fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
///         ctx.write("out", "value", self.state)?;
///         self.state = !self.state;
///         Ok(())
///     }
/// }
/// ```
pub trait Process: Send + 'static {
    /// Execute one cycle of logic.
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError>;
}

/// Construction of a process from its bus bindings.
///
/// `setup` receives the bus handles in the order the caller listed them
/// and must bind every one of them to a field name through
/// [`Ports::map_inputs`] / [`Ports::map_outputs`], then build any
/// internal state from `params`.
pub trait Setup: Process + Sized {
    /// Extra construction parameters (widths, initial values, ...).
    type Params;

    /// Declare the binding shape and build the process.
    fn setup(
        ports: &mut Ports,
        inputs: &[BusId],
        outputs: &[BusId],
        params: Self::Params,
    ) -> Result<Self, BindError>;
}
