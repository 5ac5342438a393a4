//! symcheck-cli library root.
//!
//! Re-exports internal modules so that integration tests can exercise the
//! config layer and the console loop without going through the binary.

pub mod config;
pub mod console;
pub mod oracles;
