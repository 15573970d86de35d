//! Trace comparison.
//!
//! Compares an expected trace (typically a recorded reference run) with
//! the trace of the current run, column by column and row by row.

use crate::table::{Sample, TraceTable};

/// One difference between an expected and an actual trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Divergence {
    /// A column in the expected trace is absent from the actual one.
    MissingColumn {
        /// The absent column.
        column: String,
    },
    /// The actual trace has a column the expected one lacks.
    ExtraColumn {
        /// The unexpected column.
        column: String,
    },
    /// A column has a different number of rows.
    LengthMismatch {
        /// The column.
        column: String,
        /// Expected row count.
        expected: usize,
        /// Actual row count.
        actual: usize,
    },
    /// A sample differs.
    ValueMismatch {
        /// The column.
        column: String,
        /// 0-based row index (row 0 is the first tick).
        row: usize,
        /// Expected sample.
        expected: Sample,
        /// Actual sample.
        actual: Sample,
    },
}

/// Compare two traces, returning every divergence found.
///
/// Columns are visited in lexicographic order, rows in tick order. An
/// empty result means the traces read identically. Booleans compare
/// equal to their 0/1 integer readings.
pub fn compare_traces(expected: &TraceTable, actual: &TraceTable) -> Vec<Divergence> {
    let mut divergences = Vec::new();

    for (name, exp) in expected.sorted_columns() {
        let Some(act) = actual.column(name) else {
            divergences.push(Divergence::MissingColumn {
                column: name.to_string(),
            });
            continue;
        };
        for (row, (e, a)) in exp.iter().zip(act).enumerate() {
            if !e.same_reading(a) {
                divergences.push(Divergence::ValueMismatch {
                    column: name.to_string(),
                    row,
                    expected: *e,
                    actual: *a,
                });
            }
        }
        if exp.len() != act.len() {
            divergences.push(Divergence::LengthMismatch {
                column: name.to_string(),
                expected: exp.len(),
                actual: act.len(),
            });
        }
    }

    for (name, _) in actual.sorted_columns() {
        if expected.column_id(name).is_none() {
            divergences.push(Divergence::ExtraColumn {
                column: name.to_string(),
            });
        }
    }

    divergences
}
