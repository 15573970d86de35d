//! Trace parsing.
//!
//! [`TraceReader`] turns a CSV trace back into a [`TraceTable`], so a
//! recorded trace can serve as the expected output of a testbench.

use std::io::BufRead;

use sme_core::Value;

use crate::error::TraceError;
use crate::table::{Sample, TraceTable};
use crate::UNDEFINED_TOKEN;

/// Reads trace tables from a byte stream.
///
/// # Examples
///
/// ```
/// use sme_trace::{Sample, TraceReader};
///
/// let table = TraceReader::new("N_B_c\nU\n1\n".as_bytes()).read_table().unwrap();
/// let col = table.column("N_B_c").unwrap();
/// assert_eq!(col[0], Sample::Undefined);
/// assert_eq!(col[1].to_string(), "1");
/// ```
pub struct TraceReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> TraceReader<R> {
    /// Wrap a source.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse the whole input.
    ///
    /// Blank lines are skipped. Integers parse to [`Value::Int`]; the
    /// format cannot tell booleans apart from 0/1 integers.
    pub fn read_table(self) -> Result<TraceTable, TraceError> {
        let mut lines = self.reader.lines();
        let header = lines.next().ok_or(TraceError::MissingHeader)??;
        let header = header.trim_end_matches('\r');

        let names: Vec<String> = if header.is_empty() {
            Vec::new()
        } else {
            header.split(',').map(str::to_string).collect()
        };
        let mut columns: Vec<Vec<Sample>> = vec![Vec::new(); names.len()];

        for (idx, line) in lines.enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            // Header is line 1.
            let line_no = idx + 2;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != names.len() {
                return Err(TraceError::MalformedRow {
                    line: line_no,
                    expected: names.len(),
                    found: fields.len(),
                });
            }
            for (col, token) in fields.into_iter().enumerate() {
                let sample = parse_sample(token).ok_or_else(|| TraceError::InvalidSample {
                    line: line_no,
                    column: names[col].clone(),
                    token: token.to_string(),
                })?;
                columns[col].push(sample);
            }
        }

        let mut table = TraceTable::new();
        for (name, samples) in names.into_iter().zip(columns) {
            if !table.insert_column(name.clone(), samples) {
                return Err(TraceError::DuplicateColumn { column: name });
            }
        }
        Ok(table)
    }
}

fn parse_sample(token: &str) -> Option<Sample> {
    if token == UNDEFINED_TOKEN {
        return Some(Sample::Undefined);
    }
    token
        .parse::<i128>()
        .ok()
        .map(|v| Sample::Defined(Value::Int(v)))
}
