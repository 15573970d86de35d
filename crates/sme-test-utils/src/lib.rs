//! Test utilities and mock types for SME development.
//!
//! Provides a [`MockEngine`] implementing [`ForeignEngine`] and, in
//! [`fixtures`], a set of small processes for wiring test networks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use sme_bus::ForeignChannel;
use sme_core::{ForeignError, Value};
use sme_engine::ForeignEngine;

/// Foreign channels behave like registers: they reset to 0 and hold
/// their value until written.
#[derive(Debug)]
struct Slot {
    pending: Option<Value>,
    committed: Value,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            pending: None,
            committed: Value::Int(0),
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    buses: IndexMap<String, IndexMap<String, Slot>>,
    loopbacks: Vec<(String, String)>,
    calls: Vec<&'static str>,
    fail_on_tick: Option<usize>,
    ticks: usize,
}

/// In-memory stand-in for a foreign simulation engine.
///
/// Buses are declared up front with [`with_bus`](MockEngine::with_bus);
/// every channel starts at 0. `propagate` commits every pending write;
/// `tick` copies committed values along each configured loopback (same
/// channel names) into the destination bus's pending slots. Every call is logged and can be
/// inspected through a [`MockHandle`] after the engine has been moved
/// into a network.
#[derive(Debug, Default)]
pub struct MockEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a bus the engine can export.
    pub fn with_bus(self, name: &str, channels: &[&str]) -> Self {
        {
            let mut state = lock(&self.state);
            let slots = channels
                .iter()
                .map(|ch| (ch.to_string(), Slot::default()))
                .collect();
            state.buses.insert(name.to_string(), slots);
        }
        self
    }

    /// On every `tick`, copy `from`'s committed values into `to`.
    pub fn with_loopback(self, from: &str, to: &str) -> Self {
        lock(&self.state)
            .loopbacks
            .push((from.to_string(), to.to_string()));
        self
    }

    /// Make the `n`-th call to `tick` (1-based) fail.
    pub fn failing_on_tick(self, n: usize) -> Self {
        lock(&self.state).fail_on_tick = Some(n);
        self
    }

    /// A handle for inspecting the engine after it is moved.
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl ForeignEngine for MockEngine {
    fn bus(&mut self, name: &str) -> Result<IndexMap<String, Box<dyn ForeignChannel>>, ForeignError> {
        let state = lock(&self.state);
        let slots = state
            .buses
            .get(name)
            .ok_or_else(|| ForeignError::new(format!("no bus named '{name}'")))?;
        Ok(slots
            .keys()
            .map(|ch| {
                let channel: Box<dyn ForeignChannel> = Box::new(MockChannel {
                    state: Arc::clone(&self.state),
                    bus: name.to_string(),
                    channel: ch.clone(),
                });
                (ch.clone(), channel)
            })
            .collect())
    }

    fn propagate(&mut self) -> Result<(), ForeignError> {
        let mut state = lock(&self.state);
        state.calls.push("propagate");
        for slot in state.buses.values_mut().flat_map(IndexMap::values_mut) {
            if let Some(v) = slot.pending.take() {
                slot.committed = v;
            }
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), ForeignError> {
        let mut state = lock(&self.state);
        state.calls.push("tick");
        state.ticks += 1;
        if state.fail_on_tick == Some(state.ticks) {
            return Err(ForeignError::new(format!("scripted failure on tick {}", state.ticks)));
        }

        let loopbacks = state.loopbacks.clone();
        for (from, to) in loopbacks {
            let values: Vec<(String, Value)> = state
                .buses
                .get(&from)
                .map(|slots| slots.iter().map(|(ch, s)| (ch.clone(), s.committed)).collect())
                .unwrap_or_default();
            let Some(dest) = state.buses.get_mut(&to) else {
                continue;
            };
            for (ch, value) in values {
                if let Some(slot) = dest.get_mut(&ch) {
                    slot.pending = Some(value);
                }
            }
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), ForeignError> {
        lock(&self.state).calls.push("finalize");
        Ok(())
    }
}

/// Read-only view of a [`MockEngine`]'s state.
#[derive(Clone, Debug)]
pub struct MockHandle {
    state: Arc<Mutex<EngineState>>,
}

impl MockHandle {
    /// Engine calls in order: `"propagate"`, `"tick"`, `"finalize"`.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.state).calls.clone()
    }

    /// Committed value of `bus.channel`.
    pub fn committed(&self, bus: &str, channel: &str) -> Option<Value> {
        lock(&self.state)
            .buses
            .get(bus)
            .and_then(|slots| slots.get(channel))
            .map(|slot| slot.committed)
    }
}

struct MockChannel {
    state: Arc<Mutex<EngineState>>,
    bus: String,
    channel: String,
}

impl MockChannel {
    fn with_slot<T>(&self, f: impl FnOnce(&mut Slot) -> Result<T, ForeignError>) -> Result<T, ForeignError> {
        let mut state = lock(&self.state);
        let slot = state
            .buses
            .get_mut(&self.bus)
            .and_then(|slots| slots.get_mut(&self.channel))
            .ok_or_else(|| ForeignError::new(format!("{}.{} vanished", self.bus, self.channel)))?;
        f(slot)
    }
}

impl ForeignChannel for MockChannel {
    fn value(&self) -> Result<Value, ForeignError> {
        self.with_slot(|slot| Ok(slot.committed))
    }

    fn set_value(&mut self, value: Value) -> Result<(), ForeignError> {
        self.with_slot(|slot| match slot.pending {
            Some(_) => Err(ForeignError::new("double write")),
            None => {
                slot.pending = Some(value);
                Ok(())
            }
        })
    }
}

fn lock(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
