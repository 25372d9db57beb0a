//! fd-core: stable foundation for the field device simulation engine.
//!
//! Contains:
//! - span (raw instrument count range + engineering-unit scaling)
//! - tag (typed tag values and the read/write accessor capability)
//! - error (shared error types)

pub mod error;
pub mod span;
pub mod tag;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FdError, FdResult};
pub use span::*;
pub use tag::*;
