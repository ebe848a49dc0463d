//! courier — client for the segmented UDP file-retrieval protocol.
//! The library surface exists so integration tests can drive a transfer
//! in-process; the binary in main.rs is a thin wrapper around it.

pub mod console;
pub mod net;
pub mod output;
pub mod transfer;
