//! Error types shared across the SME workspace.
//!
//! Organized by failure class: [`TypeError`] is a configuration-time
//! failure, [`ChannelError`] and [`ProtocolError`] are protocol
//! violations raised while the clock is running, and [`ForeignError`]
//! carries faults reported by a foreign simulation engine.

use thiserror::Error;

use crate::types::TypeKind;
use crate::value::Value;

/// A type tag that does not match `b | i<width> | u<width>`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The tag could not be parsed.
    #[error("invalid type tag '{tag}'")]
    InvalidType {
        /// The rejected tag.
        tag: String,
    },
}

/// A violation of the single-channel read/write protocol.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel was already driven this cycle.
    #[error("double write: channel already driven with {pending}, attempted {attempted}")]
    DoubleWrite {
        /// The value written earlier in the cycle.
        pending: Value,
        /// The rejected second value.
        attempted: Value,
    },
    /// The channel has no committed value to read.
    #[error("read of undriven channel")]
    UndrivenRead,
    /// The value does not fit the channel's declared type.
    #[error("value {value} out of range for type {kind}")]
    OutOfRange {
        /// The rejected value.
        value: Value,
        /// The channel's declared type.
        kind: TypeKind,
    },
}

/// A protocol violation located on a specific bus.
///
/// Fatal: the in-progress tick is aborted and the network cannot be
/// resumed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A channel-level fault.
    #[error("{bus}.{channel}: {source}")]
    Channel {
        /// Bus owning the channel.
        bus: String,
        /// The faulting channel.
        channel: String,
        /// What went wrong.
        #[source]
        source: ChannelError,
    },
    /// The channel name is not declared on the bus.
    #[error("bus '{bus}' has no channel '{channel}'")]
    UnknownChannel {
        /// The bus that was addressed.
        bus: String,
        /// The undeclared channel name.
        channel: String,
    },
    /// A foreign bus was asked to propagate itself.
    #[error("bus '{bus}' is driven by the foreign engine and cannot be propagated locally")]
    ForeignPropagation {
        /// The foreign bus.
        bus: String,
    },
    /// The foreign engine rejected a channel access.
    #[error("{bus}.{channel}: {source}")]
    Foreign {
        /// The foreign bus.
        bus: String,
        /// The channel being accessed.
        channel: String,
        /// The engine's report.
        #[source]
        source: ForeignError,
    },
}

impl ProtocolError {
    /// Whether this is a read of an undriven channel.
    ///
    /// Trace capture is the one place this fault is expected and recorded
    /// as an undefined sample instead of being propagated.
    pub fn is_undriven_read(&self) -> bool {
        matches!(
            self,
            Self::Channel {
                source: ChannelError::UndrivenRead,
                ..
            }
        )
    }
}

/// A failure reported by a foreign simulation engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("foreign engine: {message}")]
pub struct ForeignError {
    /// The engine's error text.
    pub message: String,
}

impl ForeignError {
    /// Wrap an engine error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_names_the_channel() {
        let err = ProtocolError::Channel {
            bus: "data".into(),
            channel: "valid".into(),
            source: ChannelError::UndrivenRead,
        };
        assert_eq!(err.to_string(), "data.valid: read of undriven channel");
        assert!(err.is_undriven_read());
    }

    #[test]
    fn double_write_is_not_an_undriven_read() {
        let err = ProtocolError::Channel {
            bus: "b".into(),
            channel: "c".into(),
            source: ChannelError::DoubleWrite {
                pending: Value::Int(1),
                attempted: Value::Int(2),
            },
        };
        assert!(!err.is_undriven_read());
        assert!(err.to_string().contains("already driven with 1"));
    }
}
