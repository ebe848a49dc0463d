//! courier-core — wire format, checksum, and reassembly for the courier
//! file-retrieval protocol. The courier binary depends on this crate.

pub mod assemble;
pub mod checksum;
pub mod config;
pub mod wire;

pub use assemble::{segment_count, AssembleError, ReassemblyBuffer};
pub use wire::{Handshake, Segment, WireError};
