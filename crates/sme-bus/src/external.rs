//! Buses whose storage lives in a foreign simulation engine.
//!
//! A foreign engine owns both the values and the propagation of its
//! buses. The kernel only ever reads and writes them through
//! [`ForeignChannel`]; widths, signedness and byte layout are the
//! engine's concern.

use indexmap::IndexMap;
use sme_core::{ForeignError, ProtocolError, Value};

/// One channel exported by a foreign engine.
pub trait ForeignChannel: Send {
    /// The committed value, as the engine currently sees it.
    fn value(&self) -> Result<Value, ForeignError>;

    /// Write the channel's pending value.
    fn set_value(&mut self, value: Value) -> Result<(), ForeignError>;
}

/// A bus declared by name and bound to a foreign engine at registration.
///
/// Starts unbound with no channels; the network fills in the channel
/// mapping obtained from its engine via [`bind`](ExternalBus::bind).
pub struct ExternalBus {
    name: String,
    channels: IndexMap<String, Box<dyn ForeignChannel>>,
}

impl ExternalBus {
    /// Declare an external bus by the name the foreign engine knows it by.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: IndexMap::new(),
        }
    }

    /// The bus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install the channel mapping obtained from the foreign engine.
    pub fn bind(&mut self, channels: IndexMap<String, Box<dyn ForeignChannel>>) {
        self.channels = channels;
    }

    /// The channel names exported by the engine.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Read a channel through the engine.
    pub fn get(&self, channel: &str) -> Result<Value, ProtocolError> {
        let ch = self
            .channels
            .get(channel)
            .ok_or_else(|| self.unknown(channel))?;
        ch.value().map_err(|e| self.fault(channel, e))
    }

    /// Write a channel through the engine.
    pub fn set(&mut self, channel: &str, value: Value) -> Result<(), ProtocolError> {
        let result = match self.channels.get_mut(channel) {
            Some(ch) => ch.set_value(value),
            None => return Err(self.unknown(channel)),
        };
        result.map_err(|e| self.fault(channel, e))
    }

    /// Always fails: foreign buses are propagated by the engine's own
    /// propagate/tick sequence, never by the kernel.
    pub fn propagate(&mut self) -> Result<(), ProtocolError> {
        Err(ProtocolError::ForeignPropagation {
            bus: self.name.clone(),
        })
    }

    fn unknown(&self, channel: &str) -> ProtocolError {
        ProtocolError::UnknownChannel {
            bus: self.name.clone(),
            channel: channel.to_string(),
        }
    }

    fn fault(&self, channel: &str, source: ForeignError) -> ProtocolError {
        ProtocolError::Foreign {
            bus: self.name.clone(),
            channel: channel.to_string(),
            source,
        }
    }
}

impl std::fmt::Debug for ExternalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalBus")
            .field("name", &self.name)
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .finish()
    }
}
