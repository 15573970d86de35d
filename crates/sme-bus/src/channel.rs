//! A single double-buffered wire.

use sme_core::{ChannelError, TypeKind, Value};

/// One wire with a pending write slot and a committed read slot.
///
/// Owned exclusively by its [`Bus`](crate::Bus). Both slots start empty.
#[derive(Clone, Debug)]
pub struct Channel {
    name: String,
    kind: Option<TypeKind>,
    pending: Option<Value>,
    committed: Option<Value>,
}

impl Channel {
    /// An untyped channel; any value may be written.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            pending: None,
            committed: None,
        }
    }

    /// A channel whose writes are range-checked against `kind`.
    pub fn typed(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new(name)
        }
    }

    /// The channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, if any.
    pub fn kind(&self) -> Option<TypeKind> {
        self.kind
    }

    /// Drive the channel for this cycle.
    ///
    /// Fails with [`ChannelError::DoubleWrite`] if the channel was already
    /// driven since the last propagate, or [`ChannelError::OutOfRange`]
    /// if `value` does not fit the declared type.
    pub fn write(&mut self, value: Value) -> Result<(), ChannelError> {
        if let Some(pending) = self.pending {
            return Err(ChannelError::DoubleWrite {
                pending,
                attempted: value,
            });
        }
        if let Some(kind) = self.kind {
            if !kind.admits(value) {
                return Err(ChannelError::OutOfRange { value, kind });
            }
        }
        self.pending = Some(value);
        Ok(())
    }

    /// The committed value. Does not consume it.
    pub fn read(&self) -> Result<Value, ChannelError> {
        self.committed.ok_or(ChannelError::UndrivenRead)
    }

    /// Commit the pending slot and clear it.
    ///
    /// Unconditional: a channel with no pending write becomes undriven.
    /// The channel models a wire without an active driver, not a register.
    pub fn propagate(&mut self) {
        self.committed = self.pending.take();
    }

    /// Whether a value has been written since the last propagate.
    pub fn is_driven(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_channel_is_undriven() {
        let ch = Channel::new("c");
        assert_eq!(ch.read(), Err(ChannelError::UndrivenRead));
        assert!(!ch.is_driven());
    }

    #[test]
    fn write_is_invisible_until_propagate() {
        let mut ch = Channel::new("c");
        ch.write(Value::Int(5)).unwrap();
        assert_eq!(ch.read(), Err(ChannelError::UndrivenRead));
        ch.propagate();
        assert_eq!(ch.read(), Ok(Value::Int(5)));
        // Reads are idempotent within a cycle.
        assert_eq!(ch.read(), Ok(Value::Int(5)));
    }

    #[test]
    fn second_write_in_a_cycle_fails() {
        let mut ch = Channel::new("c");
        ch.write(Value::Int(1)).unwrap();
        assert_eq!(
            ch.write(Value::Int(2)),
            Err(ChannelError::DoubleWrite {
                pending: Value::Int(1),
                attempted: Value::Int(2),
            })
        );
        ch.propagate();
        ch.write(Value::Int(3)).unwrap();
    }

    #[test]
    fn undriven_cycle_clears_committed_value() {
        let mut ch = Channel::new("c");
        ch.write(Value::Int(5)).unwrap();
        ch.propagate();
        assert_eq!(ch.read(), Ok(Value::Int(5)));
        ch.propagate();
        assert_eq!(ch.read(), Err(ChannelError::UndrivenRead));
    }

    #[test]
    fn typed_channel_rejects_out_of_range() {
        let kind = TypeKind::Unsigned { width: 1 };
        let mut ch = Channel::typed("bit", kind);
        assert_eq!(
            ch.write(Value::Int(2)),
            Err(ChannelError::OutOfRange {
                value: Value::Int(2),
                kind,
            })
        );
        // A rejected write does not drive the channel.
        assert!(!ch.is_driven());
        ch.write(Value::Int(1)).unwrap();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Whatever is written in cycle k is exactly what is read in
            /// cycle k+1, and an unwritten cycle reads back as undriven.
            #[test]
            fn reads_lag_writes_by_one_cycle(
                schedule in prop::collection::vec(prop::option::of(any::<i64>()), 1..64),
            ) {
                let mut ch = Channel::new("c");
                let mut previous: Option<i64> = None;
                for write in schedule {
                    ch.propagate();
                    match previous {
                        Some(v) => prop_assert_eq!(ch.read(), Ok(Value::from(v))),
                        None => prop_assert_eq!(ch.read(), Err(ChannelError::UndrivenRead)),
                    }
                    if let Some(v) = write {
                        ch.write(Value::from(v)).unwrap();
                        prop_assert!(ch.write(Value::from(v)).is_err());
                    }
                    previous = write;
                }
            }
        }
    }
}
