//! Error types for process binding and execution.

use sme_core::{BusId, ProtocolError};
use thiserror::Error;

/// Errors from binding a process to its buses (wiring time).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BindError {
    /// The bus list and the field-name list differ in length.
    #[error("process '{process}': {buses} buses mapped onto {fields} field names")]
    BusMapMismatch {
        /// The process being set up.
        process: String,
        /// Number of buses supplied.
        buses: usize,
        /// Number of field names supplied.
        fields: usize,
    },
    /// A field name was bound twice.
    #[error("process '{process}': field '{field}' is already bound")]
    DuplicateField {
        /// The process being set up.
        process: String,
        /// The repeated field name.
        field: String,
    },
    /// Process-specific setup failure.
    #[error("process '{process}': setup failed: {reason}")]
    SetupFailed {
        /// The process being set up.
        process: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Errors raised while a process runs (tick time). All are fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// A bus read or write violated the channel protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The field name is not bound on this process.
    #[error("process '{process}': no bus bound to field '{field}'")]
    UnboundField {
        /// The running process.
        process: String,
        /// The unknown field.
        field: String,
    },
    /// A read through a field bound as an output.
    #[error("process '{process}': field '{field}' is an output and cannot be read")]
    NotAnInput {
        /// The running process.
        process: String,
        /// The output field.
        field: String,
    },
    /// A write through a field bound as an input (the reading end of a bus).
    #[error("process '{process}': field '{field}' is an input and cannot be written")]
    NotAnOutput {
        /// The running process.
        process: String,
        /// The input field.
        field: String,
    },
    /// A bound handle does not resolve to a bus.
    #[error("process '{process}': bus handle {bus} does not resolve")]
    DanglingBus {
        /// The running process.
        process: String,
        /// The unresolved handle.
        bus: BusId,
    },
    /// Process-specific failure.
    #[error("process '{process}' failed: {reason}")]
    Failed {
        /// The running process.
        process: String,
        /// Description of the failure.
        reason: String,
    },
}
