//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → server.rs (Axum setup, middleware stack, request ID)
//!     → geo middleware (region cookie on matched paths)
//!     → pages.rs (page documents through the cache) |
//!       revalidate.rs (webhook-triggered cache busting)
//!     → JSON response
//! ```

pub mod pages;
pub mod revalidate;
pub mod server;

pub use server::{AppState, HttpServer};
