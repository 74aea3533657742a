//! Wire types exchanged between the WSN simulation backend and its viewers.

pub mod control;
pub mod error;
pub mod mapping;
pub mod snapshot;
pub mod stats;

pub use snapshot::{Node, NodeId, NodeKind, Packet, Snapshot};
