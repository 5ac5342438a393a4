pub mod prediction;
pub mod question;
pub mod session;
pub mod severity;
pub mod transcript;
