//! Device models for the field device simulation engine.
//!
//! Each device stands in for one piece of physical instrumentation wired to a
//! programmable controller: it reads its command or setpoint tags through a
//! [`fd_core::TagAccessor`], computes the response the real device would
//! produce (travel delays, rate limits, unit scaling), and writes its
//! feedback and indication tags.
//!
//! # Architecture
//!
//! - Immutable per-device configuration records are separated from mutable
//!   runtime state records; a device couples one of each.
//! - All devices implement the [`Device`] update contract: one infallible
//!   `update` per polling cycle, driven by a caller-supplied monotonic time.
//! - Timing is explicit (`now` in seconds) so tests inject synthetic deltas
//!   instead of sleeping.

pub mod analog_input;
pub mod control_valve;
pub mod device;
pub mod error;
pub mod switching_valve;

#[cfg(test)]
pub(crate) mod testutil;

pub use analog_input::{AnalogInput, AnalogInputConfig, AnalogInputState, GatingMode};
pub use control_valve::{ControlValve, ControlValveConfig, ControlValveState};
pub use device::{Device, DeviceConfig};
pub use error::{DeviceError, DeviceResult};
pub use switching_valve::{
    SwitchingValve, SwitchingValveConfig, SwitchingValveState, ValvePolarity,
};
