//! HTTP surface for the configuration service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router: /health + admin routes)
//!     → admin::auth (bearer check against the live API key)
//!     → admin::handlers (snapshot reads, partial updates)
//!     → JSON response
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
