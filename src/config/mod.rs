//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → persistence.rs (parse partial JSON)
//!     → normalize.rs (defaults + overlay)
//!     → ConfigRecord held by store.rs (RwLock)
//!     → read by request workers, admin handlers, rotation
//!
//! On admin update:
//!     manager.rs validates & applies via store.rs
//!     → rotation cursor reset when the pool changed
//!     → snapshot written back by persistence.rs
//! ```
//!
//! # Design Decisions
//! - One canonical record shape for memory and disk; every held field is
//!   already normalized, so save/load round-trips exactly
//! - Partial input is a struct of Options, shared by file parsing and the
//!   admin update payload
//! - Two independent locks: the record's RwLock here, the rotation cursor's
//!   Mutex in `rotation`; the store lock is never held while taking the
//!   rotor lock

pub mod error;
pub mod manager;
pub mod normalize;
pub mod persistence;
pub mod schema;
pub mod store;

pub use error::{ConfigError, ValidationError};
pub use manager::{ConfigManager, UpdateOutcome};
pub use schema::{ConfigInput, ConfigRecord};
pub use store::ConfigStore;
