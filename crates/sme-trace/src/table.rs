//! The in-memory trace table.

use std::fmt;

use indexmap::IndexMap;
use sme_core::Value;

use crate::error::TraceError;
use crate::UNDEFINED_TOKEN;

/// Build the column name for a traced channel.
///
/// Format: `<NetworkName>_<BusName>_<ChannelName>`.
pub fn column_name(network: &str, bus: &str, channel: &str) -> String {
    format!("{network}_{bus}_{channel}")
}

/// One recorded entry in a trace column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    /// The channel had no committed value after propagation.
    Undefined,
    /// The channel's committed value.
    Defined(Value),
}

impl Sample {
    /// Whether two samples render to the same trace token.
    ///
    /// `Bool(true)` and `Int(1)` are the same reading: the trace format
    /// does not distinguish them.
    pub fn same_reading(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Defined(a), Self::Defined(b)) => a.as_int() == b.as_int(),
            _ => false,
        }
    }
}

impl From<Option<Value>> for Sample {
    fn from(v: Option<Value>) -> Self {
        v.map_or(Self::Undefined, Self::Defined)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str(UNDEFINED_TOKEN),
            Self::Defined(v) => write!(f, "{v}"),
        }
    }
}

/// Position of a column within a [`TraceTable`].
///
/// Issued by [`TraceTable::ensure_column`]; stays valid for the lifetime
/// of the table because columns are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnId(usize);

/// Append-only, column-keyed store of per-tick samples.
///
/// Columns keep registration order internally; emission order is
/// lexicographic (see [`TraceTable::sorted_columns`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceTable {
    columns: IndexMap<String, Vec<Sample>>,
}

impl TraceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of column `name`, creating it empty if absent.
    ///
    /// Idempotent: calling twice with the same name yields the same id and
    /// never duplicates the column.
    pub fn ensure_column(&mut self, name: &str) -> ColumnId {
        if let Some(idx) = self.columns.get_index_of(name) {
            return ColumnId(idx);
        }
        let (idx, _) = self.columns.insert_full(name.to_string(), Vec::new());
        ColumnId(idx)
    }

    /// Look up a column's id without creating it.
    pub fn column_id(&self, name: &str) -> Option<ColumnId> {
        self.columns.get_index_of(name).map(ColumnId)
    }

    /// Append one sample to a column.
    pub fn append(&mut self, column: ColumnId, sample: Sample) {
        match self.columns.get_index_mut(column.0) {
            Some((_, samples)) => samples.push(sample),
            None => debug_assert!(false, "column id {} not issued by this table", column.0),
        }
    }

    /// All samples recorded for `name`.
    pub fn column(&self, name: &str) -> Option<&[Sample]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in registration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns sorted lexicographically by name.
    pub fn sorted_columns(&self) -> Vec<(&str, &[Sample])> {
        let mut cols: Vec<(&str, &[Sample])> = self
            .columns
            .iter()
            .map(|(name, samples)| (name.as_str(), samples.as_slice()))
            .collect();
        cols.sort_unstable_by(|a, b| a.0.cmp(b.0));
        cols
    }

    /// Number of rows, checking that every column has the same length.
    ///
    /// A table with no columns has zero rows.
    pub fn row_count(&self) -> Result<usize, TraceError> {
        let mut iter = self.columns.iter();
        let Some((_, first)) = iter.next() else {
            return Ok(0);
        };
        let expected = first.len();
        for (name, samples) in iter {
            if samples.len() != expected {
                return Err(TraceError::RaggedColumns {
                    column: name.clone(),
                    len: samples.len(),
                    expected,
                });
            }
        }
        Ok(expected)
    }

    pub(crate) fn insert_column(&mut self, name: String, samples: Vec<Sample>) -> bool {
        self.columns.insert(name, samples).is_none()
    }
}
