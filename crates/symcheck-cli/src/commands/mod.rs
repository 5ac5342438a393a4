pub mod assess;
pub mod config;
pub mod questions;
