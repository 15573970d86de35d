//! Handle-indexed storage for a network's buses.
//!
//! The network owns every bus through a [`BusTable`]; processes hold only
//! [`BusId`] handles into it.

use sme_core::{BusId, ProtocolError, Value};
use sme_trace::TraceTable;

use crate::bus::Bus;
use crate::external::ExternalBus;

/// A registered bus, either kernel-driven or foreign-driven.
#[derive(Debug)]
pub enum BusEntry {
    /// Propagated by the kernel every tick.
    Local(Bus),
    /// Propagated by a foreign engine.
    External(ExternalBus),
}

impl BusEntry {
    /// The bus name.
    pub fn name(&self) -> &str {
        match self {
            Self::Local(bus) => bus.name(),
            Self::External(bus) => bus.name(),
        }
    }

    /// Read a channel's committed value.
    pub fn get(&self, channel: &str) -> Result<Value, ProtocolError> {
        match self {
            Self::Local(bus) => bus.get(channel),
            Self::External(bus) => bus.get(channel),
        }
    }

    /// Drive a channel for this cycle.
    pub fn set(&mut self, channel: &str, value: Value) -> Result<(), ProtocolError> {
        match self {
            Self::Local(bus) => bus.set(channel, value),
            Self::External(bus) => bus.set(channel, value),
        }
    }

    /// Channel names in declaration order.
    pub fn channel_names(&self) -> Vec<&str> {
        match self {
            Self::Local(bus) => bus.channel_names().collect(),
            Self::External(bus) => bus.channel_names().collect(),
        }
    }

    /// Whether the bus is driven by a foreign engine.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// All buses of one network, in registration order.
#[derive(Debug, Default)]
pub struct BusTable {
    entries: Vec<BusEntry>,
}

impl BusTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bus; its handle is its registration index.
    pub fn push(&mut self, entry: BusEntry) -> BusId {
        let id = BusId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    /// Look up a bus by handle.
    pub fn get(&self, id: BusId) -> Option<&BusEntry> {
        self.entries.get(id.0 as usize)
    }

    /// Look up a bus by handle, mutably.
    pub fn get_mut(&mut self, id: BusId) -> Option<&mut BusEntry> {
        self.entries.get_mut(id.0 as usize)
    }

    /// Find a bus handle by name.
    pub fn find(&self, name: &str) -> Option<BusId> {
        self.entries
            .iter()
            .position(|e| e.name() == name)
            .map(|i| BusId(i as u32))
    }

    /// Whether `id` was issued by this table.
    pub fn contains(&self, id: BusId) -> bool {
        (id.0 as usize) < self.entries.len()
    }

    /// Number of registered buses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no bus is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buses with their handles, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BusId, &BusEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (BusId(i as u32), e))
    }

    /// Tick every local bus in registration order.
    ///
    /// External buses are skipped: their propagation belongs to the
    /// foreign engine.
    pub fn tick_local(&mut self, mut trace: Option<&mut TraceTable>) {
        for entry in &mut self.entries {
            if let BusEntry::Local(bus) = entry {
                bus.tick(trace.as_deref_mut());
            }
        }
    }
}
