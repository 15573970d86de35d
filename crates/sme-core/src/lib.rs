//! Core types for the SME simulation kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the SME workspace:
//! handle IDs, channel values, type descriptors, and the error taxonomy
//! shared by buses, processes, and the network clock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod types;
pub mod value;

pub use error::{ChannelError, ForeignError, ProtocolError, TypeError};
pub use id::{BusId, ProcessId, TickId};
pub use types::{TypeDescriptor, TypeKind};
pub use value::Value;
