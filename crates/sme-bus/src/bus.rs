//! Named, ordered groups of channels.

use indexmap::IndexMap;
use smallvec::SmallVec;
use sme_core::{ChannelError, ProtocolError, TypeError, TypeKind, Value};
use sme_trace::{column_name, ColumnId, Sample, TraceTable};

use crate::channel::Channel;

/// A named bus: the unit of wiring between processes.
///
/// The channel set is fixed at construction. Channels keep declaration
/// order, which is also the order they are propagated and sampled in.
///
/// # Examples
///
/// ```
/// use sme_bus::Bus;
/// use sme_core::Value;
///
/// let mut bus = Bus::new("data", ["valid", "value"]);
/// bus.set("value", Value::Int(7)).unwrap();
/// assert!(bus.get("value").is_err()); // not visible until propagate
/// bus.tick(None);
/// assert_eq!(bus.get("value").unwrap(), Value::Int(7));
/// ```
#[derive(Clone, Debug)]
pub struct Bus {
    name: String,
    channels: IndexMap<String, Channel>,
    parent: Option<String>,
    /// Trace columns in channel order, present once tracing is enabled.
    trace_columns: Option<SmallVec<[ColumnId; 8]>>,
}

impl Bus {
    /// A bus of untyped channels.
    ///
    /// Repeated channel names collapse into a single channel.
    pub fn new<I, S>(name: impl Into<String>, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels = channels
            .into_iter()
            .map(|ch| {
                let ch = ch.into();
                (ch.clone(), Channel::new(ch))
            })
            .collect();
        Self::from_channels(name.into(), channels)
    }

    /// A bus of typed channels, each declared with a type tag.
    ///
    /// Every tag is parsed here; an invalid tag fails construction with
    /// [`TypeError::InvalidType`].
    pub fn typed<'a, I>(name: impl Into<String>, channels: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let channels = channels
            .into_iter()
            .map(|(ch, tag)| {
                let kind: TypeKind = tag.parse()?;
                Ok((ch.to_string(), Channel::typed(ch, kind)))
            })
            .collect::<Result<IndexMap<_, _>, TypeError>>()?;
        Ok(Self::from_channels(name.into(), channels))
    }

    fn from_channels(name: String, channels: IndexMap<String, Channel>) -> Self {
        Self {
            name,
            channels,
            parent: None,
            trace_columns: None,
        }
    }

    /// The bus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the network this bus is registered with, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Record the owning network's name. Called once at registration.
    pub fn attach_to(&mut self, network: &str) {
        self.parent = Some(network.to_string());
    }

    /// The declared channel names, in declaration order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Look up a channel.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Read the committed value of `channel`.
    pub fn get(&self, channel: &str) -> Result<Value, ProtocolError> {
        let ch = self.lookup(channel)?;
        ch.read().map_err(|e| self.fault(channel, e))
    }

    /// Drive `channel` with `value` for this cycle.
    pub fn set(&mut self, channel: &str, value: Value) -> Result<(), ProtocolError> {
        let result = match self.channels.get_mut(channel) {
            Some(ch) => ch.write(value),
            None => return Err(self.unknown(channel)),
        };
        result.map_err(|e| self.fault(channel, e))
    }

    /// Trace column name for one of this bus's channels.
    ///
    /// `<network>_<bus>_<channel>`; an unattached bus uses `<bus>_<channel>`.
    pub fn trace_column(&self, channel: &str) -> String {
        match &self.parent {
            Some(network) => column_name(network, &self.name, channel),
            None => format!("{}_{}", self.name, channel),
        }
    }

    /// Ensure a column exists in `table` for every channel and start
    /// sampling into it on every [`tick`](Bus::tick).
    ///
    /// Idempotent for the same table: existing columns are reused, never
    /// duplicated.
    pub fn enable_trace(&mut self, table: &mut TraceTable) {
        let columns = self
            .channels
            .keys()
            .map(|ch| table.ensure_column(&self.trace_column(ch)))
            .collect();
        self.trace_columns = Some(columns);
    }

    /// Whether [`enable_trace`](Bus::enable_trace) has been called.
    pub fn is_traced(&self) -> bool {
        self.trace_columns.is_some()
    }

    /// Propagate every channel without sampling.
    pub fn propagate(&mut self) {
        for ch in self.channels.values_mut() {
            ch.propagate();
        }
    }

    /// Propagate every channel and, when a trace table is supplied and
    /// this bus is traced, append each channel's committed value.
    ///
    /// An undriven channel is recorded as [`Sample::Undefined`]; this is
    /// the only place an undriven read is expected rather than fatal.
    pub fn tick(&mut self, trace: Option<&mut TraceTable>) {
        let (Some(table), true) = (trace, self.is_traced()) else {
            self.propagate();
            return;
        };
        let columns = self.trace_columns.iter().flatten();
        for (ch, &column) in self.channels.values_mut().zip(columns) {
            ch.propagate();
            // `read` only fails on an undriven channel.
            let sample = match ch.read() {
                Ok(v) => Sample::Defined(v),
                Err(_) => Sample::Undefined,
            };
            table.append(column, sample);
        }
    }

    fn lookup(&self, channel: &str) -> Result<&Channel, ProtocolError> {
        self.channels
            .get(channel)
            .ok_or_else(|| self.unknown(channel))
    }

    fn unknown(&self, channel: &str) -> ProtocolError {
        ProtocolError::UnknownChannel {
            bus: self.name.clone(),
            channel: channel.to_string(),
        }
    }

    fn fault(&self, channel: &str, source: ChannelError) -> ProtocolError {
        ProtocolError::Channel {
            bus: self.name.clone(),
            channel: channel.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_keep_declaration_order() {
        let bus = Bus::new("b", ["z", "a", "m"]);
        assert_eq!(bus.channel_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn unknown_channel_is_reported() {
        let mut bus = Bus::new("b", ["x"]);
        let expected = ProtocolError::UnknownChannel {
            bus: "b".into(),
            channel: "y".into(),
        };
        assert_eq!(bus.get("y"), Err(expected.clone()));
        assert_eq!(bus.set("y", Value::Int(0)), Err(expected));
    }

    #[test]
    fn undriven_get_names_bus_and_channel() {
        let bus = Bus::new("b", ["x"]);
        let err = bus.get("x").unwrap_err();
        assert!(err.is_undriven_read());
        assert_eq!(err.to_string(), "b.x: read of undriven channel");
    }

    #[test]
    fn typed_bus_rejects_bad_tag_at_construction() {
        let err = Bus::typed("b", [("ok", "u8"), ("bad", "x3")]).unwrap_err();
        assert_eq!(err, TypeError::InvalidType { tag: "x3".into() });
    }

    #[test]
    fn typed_bus_range_checks_writes() {
        let mut bus = Bus::typed("b", [("flag", "b"), ("data", "i4")]).unwrap();
        assert!(bus.set("data", Value::Int(-8)).is_ok());
        let err = bus.set("flag", Value::Int(3)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Channel {
                source: ChannelError::OutOfRange { .. },
                ..
            }
        ));
    }

    #[test]
    fn trace_column_includes_parent() {
        let mut bus = Bus::new("B", ["c"]);
        assert_eq!(bus.trace_column("c"), "B_c");
        bus.attach_to("N");
        assert_eq!(bus.trace_column("c"), "N_B_c");
    }

    #[test]
    fn enable_trace_twice_does_not_duplicate_columns() {
        let mut table = TraceTable::new();
        let mut bus = Bus::new("B", ["c", "d"]);
        bus.attach_to("N");
        bus.enable_trace(&mut table);
        bus.enable_trace(&mut table);
        assert_eq!(table.len(), 2);

        bus.set("c", Value::Int(1)).unwrap();
        bus.tick(Some(&mut table));
        assert_eq!(table.row_count().unwrap(), 1);
    }

    #[test]
    fn tick_samples_after_propagate() {
        let mut table = TraceTable::new();
        let mut bus = Bus::new("B", ["c"]);
        bus.attach_to("N");
        bus.enable_trace(&mut table);

        bus.tick(Some(&mut table));
        bus.set("c", Value::Bool(true)).unwrap();
        bus.tick(Some(&mut table));
        bus.tick(Some(&mut table));

        assert_eq!(
            table.column("N_B_c").unwrap(),
            &[
                Sample::Undefined,
                Sample::Defined(Value::Bool(true)),
                Sample::Undefined,
            ]
        );
    }

    #[test]
    fn untraced_tick_still_propagates() {
        let mut bus = Bus::new("B", ["c"]);
        bus.set("c", Value::Int(9)).unwrap();
        bus.tick(None);
        assert_eq!(bus.get("c"), Ok(Value::Int(9)));
    }
}
