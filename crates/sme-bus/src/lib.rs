//! Double-buffered channels and buses for SME simulations.
//!
//! # Architecture
//!
//! ```text
//! BusTable (owned by the network, indexed by BusId)
//! ├── BusEntry::Local(Bus)
//! │   └── Channel[]: pending write slot + committed read slot
//! └── BusEntry::External(ExternalBus)
//!     └── Box<dyn ForeignChannel>[]: storage owned by a foreign engine
//! ```
//!
//! # Channel lifecycle per tick
//!
//! 1. `propagate()`: the pending write becomes the committed read; the
//!    pending slot is emptied whether or not it was driven
//! 2. processes `read()` the committed slot and `write()` the pending slot
//!
//! A value written in tick *k* is therefore first readable in tick *k+1*,
//! and a channel not re-driven in tick *k* is undriven in tick *k+1*.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bus;
pub mod channel;
pub mod external;
pub mod table;

pub use bus::Bus;
pub use channel::Channel;
pub use external::{ExternalBus, ForeignChannel};
pub use table::{BusEntry, BusTable};
