//! Analog control valve model.
//!
//! Converts a setpoint (scaled against the engineering span declared by the
//! setpoint channel itself) into a positional feedback count over the fixed
//! instrument span, and derives open/closed limit indications from that
//! feedback with inclusive boundary checks.

use fd_core::{CLOSED_LIMIT, OPEN_LIMIT, RawSpan, TagAccessor, WriteValue};
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::DeviceResult;

/// Immutable control valve configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlValveConfig {
    /// Device name.
    pub name: String,
    /// Setpoint channel tag (value plus declared engineering min/max).
    pub setpoint_tag: String,
    /// Positional feedback tag, written in raw counts.
    pub feedback_tag: String,
    /// Open limit indication tag.
    pub open_ind_tag: String,
    /// Closed limit indication tag.
    pub closed_ind_tag: String,
    /// Opaque routing key for the external controller channel.
    pub controller_address: String,
}

/// Mutable control valve runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlValveState {
    /// Feedback count derived on the last successful read.
    pub feedback: i32,
    /// Open limit indication.
    pub open_ind: bool,
    /// Closed limit indication.
    pub closed_ind: bool,
}

/// Control valve device: configuration plus runtime state.
#[derive(Debug, Clone)]
pub struct ControlValve {
    config: ControlValveConfig,
    state: ControlValveState,
    span: RawSpan,
}

impl ControlValve {
    /// Build a control valve resting at the bottom of the raw span.
    pub fn new(config: ControlValveConfig) -> DeviceResult<Self> {
        let span = RawSpan::DEFAULT;
        Ok(Self {
            config,
            state: ControlValveState {
                feedback: span.lo as i32,
                open_ind: false,
                closed_ind: true,
            },
            span,
        })
    }

    /// Current runtime state.
    pub fn state(&self) -> &ControlValveState {
        &self.state
    }
}

impl Device for ControlValve {
    fn name(&self) -> &str {
        &self.config.name
    }

    // Positional response is immediate; the control valve has no travel model.
    fn update(&mut self, io: &mut dyn TagAccessor, _now: f64) {
        let Some(setpoint) = io.read(&self.config.setpoint_tag).as_channel() else {
            // Absent or mismatched setpoint: retain previous feedback,
            // produce no output this cycle.
            return;
        };
        let declared = setpoint.max - setpoint.min;
        if declared == 0.0 || !declared.is_finite() {
            return;
        }

        let raw = self.span.width() * (setpoint.value - setpoint.min) / declared + self.span.lo;
        let feedback = self.span.clamp(raw.round()) as i32;

        self.state.feedback = feedback;
        self.state.closed_ind = feedback <= CLOSED_LIMIT;
        self.state.open_ind = feedback >= OPEN_LIMIT;

        io.write(&self.config.feedback_tag, WriteValue::Count(feedback));
        io.write(
            &self.config.open_ind_tag,
            WriteValue::Bool(self.state.open_ind),
        );
        io.write(
            &self.config.closed_ind_tag,
            WriteValue::Bool(self.state.closed_ind),
        );
    }
}
