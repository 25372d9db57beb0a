//! Orchestration glue for the field device simulation engine.
//!
//! Owns the pieces that sit between the device models and the external
//! polling loop: an insertion-ordered device registry, a poll-cycle runner
//! with an injectable clock, and an in-memory tag table that stands in for
//! the controller channel in tests and demos.
//!
//! Devices are independent; update order within a cycle is whatever order
//! they were registered in. Devices sharing a tag name tolerate reading the
//! previous cycle's value from another device's output.

pub mod cycle;
pub mod error;
pub mod registry;
pub mod table;

pub use cycle::{Clock, ManualClock, PollCycle, WallClock};
pub use error::{SimError, SimResult};
pub use registry::DeviceRegistry;
pub use table::TagTable;
