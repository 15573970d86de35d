//! Benchmark profiles for the SME simulation kernel.
//!
//! - [`pipeline_profile`]: a counter feeding a chain of delay stages
//! - [`adder_profile`]: independent counter pairs feeding adders
//!
//! Both are local networks; `tracing` toggles in-memory trace capture.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sme_engine::{Mode, Network, NetworkConfig, WiringError};
use sme_test_utils::fixtures::{Adder, Counter, PassThrough};

fn config(tracing: bool) -> NetworkConfig {
    NetworkConfig {
        tracing,
        ..NetworkConfig::default()
    }
}

/// A 16-bit counter followed by `stages` pass-through stages, one bus
/// per stage.
pub fn pipeline_profile(stages: usize, tracing: bool) -> Result<Network, WiringError> {
    Network::wire("pipeline", config(tracing), Mode::Local, |w| {
        let mut prev = w.bus("s0", ["value"])?;
        w.process::<Counter>("counter", &[], &[prev], 16)?;
        for i in 1..=stages {
            let next = w.bus(format!("s{i}"), ["value"])?;
            w.process::<PassThrough>(format!("stage{i}"), &[prev], &[next], ())?;
            prev = next;
        }
        Ok(())
    })
}

/// `pairs` independent `counter, counter -> adder` groups.
pub fn adder_profile(pairs: usize, tracing: bool) -> Result<Network, WiringError> {
    Network::wire("adders", config(tracing), Mode::Local, |w| {
        for i in 0..pairs {
            let a = w.bus(format!("a{i}"), ["value"])?;
            let b = w.bus(format!("b{i}"), ["value"])?;
            let s = w.bus(format!("sum{i}"), ["value"])?;
            w.process::<Counter>(format!("ca{i}"), &[], &[a], 8)?;
            w.process::<Counter>(format!("cb{i}"), &[], &[b], 12)?;
            w.process::<Adder>(format!("add{i}"), &[a, b], &[s], ())?;
        }
        Ok(())
    })
}
