//! Trace emission.
//!
//! [`TraceWriter`] streams a [`TraceTable`] to any `Write` sink in the
//! CSV trace format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::TraceError;
use crate::table::TraceTable;

/// Writes trace tables to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use sme_core::Value;
/// use sme_trace::{Sample, TraceTable, TraceWriter};
///
/// let mut table = TraceTable::new();
/// let c = table.ensure_column("N_B_c");
/// table.append(c, Sample::Undefined);
/// table.append(c, Sample::Defined(Value::Int(1)));
///
/// let mut writer = TraceWriter::new(Vec::new());
/// assert_eq!(writer.write_table(&table).unwrap(), 2);
/// assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "N_B_c\nU\n1\n");
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
}

impl<W: Write> TraceWriter<W> {
    /// Wrap a sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the header and every row of `table`; returns the row count.
    ///
    /// Columns are emitted in lexicographic order so generated traces are
    /// reproducible regardless of registration order. Fails with
    /// [`TraceError::RaggedColumns`] before writing anything if the
    /// columns are not the same length.
    pub fn write_table(&mut self, table: &TraceTable) -> Result<usize, TraceError> {
        let rows = table.row_count()?;
        let columns = table.sorted_columns();

        let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        writeln!(self.writer, "{}", header.join(","))?;

        for row in 0..rows {
            for (i, (_, samples)) in columns.iter().enumerate() {
                if i > 0 {
                    self.writer.write_all(b",")?;
                }
                write!(self.writer, "{}", samples[row])?;
            }
            self.writer.write_all(b"\n")?;
        }
        Ok(rows)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), TraceError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write `table` to `path`, replacing any existing file.
pub fn write_trace_file(path: &Path, table: &TraceTable) -> Result<usize, TraceError> {
    let mut writer = TraceWriter::new(BufWriter::new(File::create(path)?));
    let rows = writer.write_table(table)?;
    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Sample;
    use sme_core::Value;

    fn render(table: &TraceTable) -> String {
        let mut w = TraceWriter::new(Vec::new());
        w.write_table(table).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn columns_are_sorted_and_rows_aligned() {
        let mut t = TraceTable::new();
        let z = t.ensure_column("N_b_z");
        let a = t.ensure_column("N_a_a");
        for v in [1, 2] {
            t.append(z, Sample::Defined(Value::Int(v)));
            t.append(a, Sample::Defined(Value::Int(-v)));
        }
        assert_eq!(render(&t), "N_a_a,N_b_z\n-1,1\n-2,2\n");
    }

    #[test]
    fn booleans_and_undefined() {
        let mut t = TraceTable::new();
        let c = t.ensure_column("c");
        t.append(c, Sample::Undefined);
        t.append(c, Sample::Defined(Value::Bool(false)));
        t.append(c, Sample::Defined(Value::Bool(true)));
        assert_eq!(render(&t), "c\nU\n0\n1\n");
    }

    #[test]
    fn ragged_table_writes_nothing() {
        let mut t = TraceTable::new();
        let a = t.ensure_column("a");
        t.ensure_column("b");
        t.append(a, Sample::Undefined);
        let mut w = TraceWriter::new(Vec::new());
        assert!(matches!(
            w.write_table(&t),
            Err(TraceError::RaggedColumns { .. })
        ));
        assert!(w.into_inner().is_empty());
    }

    #[test]
    fn file_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let mut t = TraceTable::new();
        let c = t.ensure_column("N_B_c");
        t.append(c, Sample::Undefined);
        assert_eq!(write_trace_file(&path, &t).unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "N_B_c\nU\n");
    }
}
