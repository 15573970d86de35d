//! Reusable process fixtures.
//!
//! Every fixture uses a single channel called [`VALUE`] on each bus it
//! touches:
//!
//! - [`Counter`]: free-running counter modulo `2^width`, no inputs.
//! - [`ConstantSource`]: drives the same value every tick.
//! - [`ScriptedWriter`]: drives a scripted sequence, one entry per tick.
//! - [`PassThrough`]: copies its input to its output.
//! - [`Adder`]: drives `lhs + rhs`.
//! - [`DoubleWriter`], [`UndrivenReader`], [`WrongWay`], [`FailingProcess`]:
//!   misbehave deterministically, for error-path tests.

use sme_core::{BusId, Value};
use sme_process::{BindError, Ports, Process, ProcessError, RunContext, Setup};

/// The channel name every fixture reads and writes.
pub const VALUE: &str = "value";

/// Read `field.value`, mapping an undriven channel to `None`.
fn read_driven(ctx: &RunContext<'_>, field: &str) -> Result<Option<Value>, ProcessError> {
    match ctx.read(field, VALUE) {
        Ok(v) => Ok(Some(v)),
        Err(ProcessError::Protocol(e)) if e.is_undriven_read() => Ok(None),
        Err(e) => Err(e),
    }
}

fn setup_failed(ports: &Ports, reason: impl Into<String>) -> BindError {
    BindError::SetupFailed {
        process: ports.process_name().to_string(),
        reason: reason.into(),
    }
}

// ── Counter ────────────────────────────────────────────────────────

/// Drives `out.value` with 0, 1, 2, ... wrapping at `2^width`.
pub struct Counter {
    width: u32,
    state: i128,
}

impl Process for Counter {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.write("out", VALUE, self.state)?;
        self.state = (self.state + 1) % (1i128 << self.width);
        Ok(())
    }
}

impl Setup for Counter {
    /// Counter width in bits, 1 to 64.
    type Params = u32;

    fn setup(
        ports: &mut Ports,
        _inputs: &[BusId],
        outputs: &[BusId],
        width: u32,
    ) -> Result<Self, BindError> {
        if !(1..=64).contains(&width) {
            return Err(setup_failed(ports, format!("unsupported width {width}")));
        }
        ports.map_outputs(outputs, &["out"])?;
        Ok(Self { width, state: 0 })
    }
}

// ── ConstantSource ─────────────────────────────────────────────────

/// Drives `out.value` with the same value every tick.
pub struct ConstantSource {
    value: Value,
}

impl Process for ConstantSource {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.write("out", VALUE, self.value)
    }
}

impl Setup for ConstantSource {
    type Params = Value;

    fn setup(
        ports: &mut Ports,
        _inputs: &[BusId],
        outputs: &[BusId],
        value: Value,
    ) -> Result<Self, BindError> {
        ports.map_outputs(outputs, &["out"])?;
        Ok(Self { value })
    }
}

// ── ScriptedWriter ─────────────────────────────────────────────────

/// Drives `out.value` with `script[k]` on its k-th run; `None` entries
/// and runs past the end of the script leave the channel undriven.
pub struct ScriptedWriter {
    script: Vec<Option<Value>>,
    step: usize,
}

impl Process for ScriptedWriter {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        let entry = self.script.get(self.step).copied().flatten();
        self.step += 1;
        match entry {
            Some(v) => ctx.write("out", VALUE, v),
            None => Ok(()),
        }
    }
}

impl Setup for ScriptedWriter {
    type Params = Vec<Option<Value>>;

    fn setup(
        ports: &mut Ports,
        _inputs: &[BusId],
        outputs: &[BusId],
        script: Vec<Option<Value>>,
    ) -> Result<Self, BindError> {
        ports.map_outputs(outputs, &["out"])?;
        Ok(Self { script, step: 0 })
    }
}

// ── PassThrough ────────────────────────────────────────────────────

/// Copies `input.value` to `output.value` when the input is driven.
pub struct PassThrough;

impl Process for PassThrough {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        match read_driven(ctx, "input")? {
            Some(v) => ctx.write("output", VALUE, v),
            None => Ok(()),
        }
    }
}

impl Setup for PassThrough {
    type Params = ();

    fn setup(
        ports: &mut Ports,
        inputs: &[BusId],
        outputs: &[BusId],
        _: (),
    ) -> Result<Self, BindError> {
        ports.map_inputs(inputs, &["input"])?;
        ports.map_outputs(outputs, &["output"])?;
        Ok(Self)
    }
}

// ── Adder ──────────────────────────────────────────────────────────

/// Drives `sum.value = lhs.value + rhs.value` once both inputs are
/// driven.
pub struct Adder;

impl Process for Adder {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        let (Some(lhs), Some(rhs)) = (read_driven(ctx, "lhs")?, read_driven(ctx, "rhs")?) else {
            return Ok(());
        };
        let sum = lhs
            .as_int()
            .checked_add(rhs.as_int())
            .ok_or_else(|| ctx.fail("sum overflows i128"))?;
        ctx.write("sum", VALUE, sum)
    }
}

impl Setup for Adder {
    type Params = ();

    fn setup(
        ports: &mut Ports,
        inputs: &[BusId],
        outputs: &[BusId],
        _: (),
    ) -> Result<Self, BindError> {
        ports.map_inputs(inputs, &["lhs", "rhs"])?;
        ports.map_outputs(outputs, &["sum"])?;
        Ok(Self)
    }
}

// ── Misbehaving processes ──────────────────────────────────────────

/// Drives `out.value` twice per run.
pub struct DoubleWriter;

impl Process for DoubleWriter {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.write("out", VALUE, 1)?;
        ctx.write("out", VALUE, 2)
    }
}

impl Setup for DoubleWriter {
    type Params = ();

    fn setup(
        ports: &mut Ports,
        _inputs: &[BusId],
        outputs: &[BusId],
        _: (),
    ) -> Result<Self, BindError> {
        ports.map_outputs(outputs, &["out"])?;
        Ok(Self)
    }
}

/// Reads `input.value` without tolerating an undriven channel.
pub struct UndrivenReader;

impl Process for UndrivenReader {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.read("input", VALUE).map(drop)
    }
}

impl Setup for UndrivenReader {
    type Params = ();

    fn setup(
        ports: &mut Ports,
        inputs: &[BusId],
        _outputs: &[BusId],
        _: (),
    ) -> Result<Self, BindError> {
        ports.map_inputs(inputs, &["input"])?;
        Ok(Self)
    }
}

/// Writes through its input field.
pub struct WrongWay;

impl Process for WrongWay {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.write("input", VALUE, true)
    }
}

impl Setup for WrongWay {
    type Params = ();

    fn setup(
        ports: &mut Ports,
        inputs: &[BusId],
        _outputs: &[BusId],
        _: (),
    ) -> Result<Self, BindError> {
        ports.map_inputs(inputs, &["input"])?;
        Ok(Self)
    }
}

/// Succeeds `n` times, then fails on every later run.
pub struct FailingProcess {
    remaining: usize,
}

impl Process for FailingProcess {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(ctx.fail(format!("scripted failure at tick {}", ctx.tick()))),
        }
    }
}

impl Setup for FailingProcess {
    type Params = usize;

    fn setup(_: &mut Ports, _: &[BusId], _: &[BusId], n: usize) -> Result<Self, BindError> {
        Ok(Self { remaining: n })
    }
}
