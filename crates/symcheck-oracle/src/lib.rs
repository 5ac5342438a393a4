//! symcheck-oracle
//!
//! The question and prediction oracles an assessment session talks to,
//! plus the adapters for the hosted services that back them.

pub mod bedrock;
pub mod error;
pub mod gemini;
pub mod inference;
pub mod oracle;
pub mod parse;
pub mod prompt;
pub mod retry;

pub use error::OracleError;
pub use oracle::{PredictionOracle, QuestionOracle};
