//! Error types for trace emission and parsing.

use std::io;

use thiserror::Error;

/// Errors from writing, reading, or validating a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// An I/O error occurred during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Columns hold different numbers of samples.
    ///
    /// Every traced channel is sampled on every propagate, so this only
    /// happens when the table was filled by hand.
    #[error("column '{column}' has {len} samples, expected {expected}")]
    RaggedColumns {
        /// The first column whose length differs.
        column: String,
        /// Its length.
        len: usize,
        /// Length of the first column.
        expected: usize,
    },
    /// The input has no header line.
    #[error("trace has no header line")]
    MissingHeader,
    /// A column name appears twice in the header.
    #[error("duplicate column '{column}' in header")]
    DuplicateColumn {
        /// The repeated name.
        column: String,
    },
    /// A data row has the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        /// 1-based line number.
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of fields on the line.
        found: usize,
    },
    /// A field is neither `U` nor a base-10 integer.
    #[error("line {line}, column '{column}': invalid sample '{token}'")]
    InvalidSample {
        /// 1-based line number.
        line: usize,
        /// Column the field belongs to.
        column: String,
        /// The offending text.
        token: String,
    },
}
