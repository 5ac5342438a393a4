//! symcheck-session
//!
//! The assessment session state machine: a bounded series of
//! question/answer turns followed by a single prediction.

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{AssessmentSession, SessionConfig, StatusChange};
