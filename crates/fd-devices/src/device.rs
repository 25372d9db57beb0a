//! The device update contract.
//!
//! Every simulated device exposes a single `update` operation taking a tag
//! accessor: read the tags it needs, compute the next output, write only its
//! own output tags. Updates are synchronous, non-blocking, infallible, and
//! idempotent across repeated calls at the same instant. The engine imposes
//! no ordering between devices; callers decide update order within a cycle.

use fd_core::TagAccessor;
use serde::{Deserialize, Serialize};

use crate::analog_input::{AnalogInput, AnalogInputConfig};
use crate::control_valve::{ControlValve, ControlValveConfig};
use crate::error::DeviceResult;
use crate::switching_valve::{SwitchingValve, SwitchingValveConfig};

/// Contract between a simulated device and the external polling loop.
pub trait Device: Send {
    /// Device name for identification and registry lookup.
    fn name(&self) -> &str;

    /// Run one simulation cycle: read → compute → write.
    ///
    /// `now` is monotonic time in seconds from the caller's clock; elapsed
    /// time between calls drives ramp magnitudes and travel deadlines.
    fn update(&mut self, io: &mut dyn TagAccessor, now: f64);
}

/// Configuration for any device kind, as handed over by the (external)
/// configuration layer. Tagged so a whole registry can be described in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceConfig {
    /// Two-position on/off valve.
    SwitchingValve(SwitchingValveConfig),
    /// Analog control valve with positional feedback.
    ControlValve(ControlValveConfig),
    /// Simulated analog process input.
    AnalogInput(AnalogInputConfig),
}

impl DeviceConfig {
    /// Device name, independent of kind.
    pub fn name(&self) -> &str {
        match self {
            Self::SwitchingValve(c) => &c.name,
            Self::ControlValve(c) => &c.name,
            Self::AnalogInput(c) => &c.name,
        }
    }

    /// Validate the configuration and build the device.
    pub fn build(self) -> DeviceResult<Box<dyn Device>> {
        Ok(match self {
            Self::SwitchingValve(c) => Box::new(SwitchingValve::new(c)?),
            Self::ControlValve(c) => Box::new(ControlValve::new(c)?),
            Self::AnalogInput(c) => Box::new(AnalogInput::new(c)?),
        })
    }
}
