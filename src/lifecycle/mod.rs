//! Process lifecycle subsystem.
//!
//! # Responsibilities
//! - Graceful shutdown coordination via a broadcast channel
//! - OS signal handling (Ctrl+C, SIGTERM)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
