//! Demo: an N-bit counter feeding a one-cycle delay stage.
//!
//! ```text
//! sme-counter [-t [FILE]] [-g [FILE]] [-C DIR] [-- CYCLES [WIDTH]]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sme::cli::Args;
use sme::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Counts 0, 1, ... modulo `2^width` on `out.value`.
struct Counter {
    modulus: i128,
    state: i128,
}

impl Process for Counter {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        ctx.write("out", "value", self.state)?;
        self.state = (self.state + 1) % self.modulus;
        Ok(())
    }
}

impl Setup for Counter {
    type Params = u32;

    fn setup(
        ports: &mut Ports,
        _inputs: &[BusId],
        outputs: &[BusId],
        width: u32,
    ) -> Result<Self, BindError> {
        ports.map_outputs(outputs, &["out"])?;
        Ok(Self {
            modulus: 1i128 << width,
            state: 0,
        })
    }
}

/// Re-drives its input one cycle later.
struct Delay;

impl Process for Delay {
    fn run(&mut self, ctx: &mut RunContext<'_>) -> Result<(), ProcessError> {
        match ctx.read("input", "value") {
            Ok(v) => ctx.write("output", "value", v),
            Err(ProcessError::Protocol(e)) if e.is_undriven_read() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Setup for Delay {
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

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cycles: u64 = match args.remaining.first() {
        Some(s) => s.parse().with_context(|| format!("invalid cycle count '{s}'"))?,
        None => 16,
    };
    let width: u32 = match args.remaining.get(1) {
        Some(s) => s.parse().with_context(|| format!("invalid width '{s}'"))?,
        None => 4,
    };
    anyhow::ensure!((1..=64).contains(&width), "width must be between 1 and 64");

    let mut sim = Simulation::new(args.run_options());
    sim.set_network("counter", Mode::Local, |w| {
        let count = w.typed_bus("count", [("value", format!("u{width}").as_str())])?;
        let delayed = w.bus("delayed", ["value"])?;
        w.process::<Counter>("counter", &[], &[count], width)?;
        w.process::<Delay>("delay", &[count], &[delayed], ())?;
        Ok(())
    })?;

    sim.run(cycles)?;
    let network = sim.network().context("network was not set")?;
    info!(ticks = %network.current_tick(), "simulation complete");
    sim.finish()?;
    Ok(())
}
