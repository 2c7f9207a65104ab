//! # Connection ID State (RFC 9000 Section 5.1)
//!
//! Peer-issued connection IDs and destination connection ID rotation.

pub mod cid_manager;


pub use cid_manager::{ConnectionIdEntry, ConnectionIdManager, RetirementSink};
