//! symcheck-core
//!
//! Pure domain types for symptom assessment sessions.
//! No I/O and no oracle dependency; this is the shared vocabulary of the
//! symcheck system.

pub mod error;
pub mod models;
