//! Structured logging setup for Haute binaries.

pub mod logger;

pub use logger::init_logger;
