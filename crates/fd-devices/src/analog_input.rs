//! Simulated analog process input.
//!
//! Resolves a process value from one of three mutually exclusive data-source
//! modes, evaluated in strict priority order each cycle:
//!
//! 1. **Passthrough** — not integrating and at least one reference tag
//!    configured: the value tracks the higher of the available references,
//!    floored at the span minimum. No rate limiting.
//! 2. **Integrating ramp** — integrating with at least one increase or
//!    decrease condition tag: boolean condition reads fold into per-direction
//!    permission flags (AND/OR gating), analog condition reads nudge the
//!    value directly by a span-derated rate, and permitted directions ramp at
//!    the configured rate times wall-clock elapsed seconds.
//! 3. **Fixed fallback** — no source tags at all: the value is pinned to the
//!    configured fixed value every cycle.
//!
//! If no rule matches, the previous value is retained. The value is clamped
//! to the raw span before every write, whichever rule fired.

use fd_core::{RawSpan, TagAccessor, TagValue, WriteValue};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::device::Device;
use crate::error::{DeviceError, DeviceResult};

/// How multiple boolean permission sources for one ramp direction combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GatingMode {
    /// Any true boolean source permits the ramp.
    #[default]
    Or,
    /// Every boolean source must be true to permit the ramp.
    And,
}

fn default_rate() -> f64 {
    1.0
}

fn default_fixed_value() -> f64 {
    fd_core::RAW_LO
}

/// Immutable analog input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogInputConfig {
    /// Device name.
    pub name: String,
    /// Simulated value output tag, written in raw counts.
    pub feedback_tag: String,
    /// External reference tags for passthrough mode (up to 2).
    #[serde(default)]
    pub reference_tags: Vec<String>,
    /// Increase condition tags for integrating mode (up to 3).
    #[serde(default)]
    pub increase_tags: Vec<String>,
    /// Decrease condition tags for integrating mode (up to 3).
    #[serde(default)]
    pub decrease_tags: Vec<String>,
    /// Configured increase rate of change, counts per second.
    #[serde(default = "default_rate")]
    pub increase_rate: f64,
    /// Configured decrease rate of change, counts per second.
    #[serde(default = "default_rate")]
    pub decrease_rate: f64,
    /// Ramp model (integrating) vs reference passthrough.
    #[serde(default)]
    pub integrating: bool,
    /// Boolean permission combination mode.
    #[serde(default)]
    pub gating: GatingMode,
    /// Fallback value in raw counts when no sources are configured.
    #[serde(default = "default_fixed_value")]
    pub fixed_value: f64,
    /// Opaque routing key for the external controller channel.
    pub controller_address: String,
}

/// Mutable analog input runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogInputState {
    /// Simulated value in raw counts.
    pub value: f64,
    /// Time of the previous update, seconds. `None` before the first call.
    pub last_update: Option<f64>,
    /// Increase permission resolved on the last integrating cycle.
    pub increase_allowed: bool,
    /// Decrease permission resolved on the last integrating cycle.
    pub decrease_allowed: bool,
}

/// Analog input device: configuration plus runtime state.
#[derive(Debug, Clone)]
pub struct AnalogInput {
    config: AnalogInputConfig,
    state: AnalogInputState,
    span: RawSpan,
}

impl AnalogInput {
    /// Validate the configuration and build the device. The initial value is
    /// the fixed fallback, clamped into the raw span.
    pub fn new(config: AnalogInputConfig) -> DeviceResult<Self> {
        if config.reference_tags.len() > 2 {
            return Err(DeviceError::InvalidConfig {
                what: "at most 2 reference tags",
            });
        }
        if config.increase_tags.len() > 3 || config.decrease_tags.len() > 3 {
            return Err(DeviceError::InvalidConfig {
                what: "at most 3 condition tags per direction",
            });
        }
        if !(config.increase_rate >= 0.0) || !(config.decrease_rate >= 0.0) {
            return Err(DeviceError::InvalidConfig {
                what: "rates of change must be non-negative",
            });
        }
        if !config.fixed_value.is_finite() {
            return Err(DeviceError::InvalidConfig {
                what: "fixed value must be finite",
            });
        }
        let span = RawSpan::DEFAULT;
        Ok(Self {
            state: AnalogInputState {
                value: span.clamp(config.fixed_value),
                last_update: None,
                increase_allowed: false,
                decrease_allowed: false,
            },
            config,
            span,
        })
    }

    /// Current runtime state.
    pub fn state(&self) -> &AnalogInputState {
        &self.state
    }

    fn has_condition_tags(&self) -> bool {
        !self.config.increase_tags.is_empty() || !self.config.decrease_tags.is_empty()
    }

    fn has_no_sources(&self) -> bool {
        self.config.reference_tags.is_empty()
            && self.config.increase_tags.is_empty()
            && self.config.decrease_tags.is_empty()
    }

    /// Passthrough: the higher of the available references, floored at the
    /// span minimum. Both absent leaves the value untouched.
    fn resolve_passthrough(&mut self, io: &mut dyn TagAccessor) {
        let mut highest: Option<f64> = None;
        for tag in &self.config.reference_tags {
            if let Some(v) = io.read(tag).as_real() {
                highest = Some(highest.map_or(v, |h| h.max(v)));
            }
        }
        if let Some(v) = highest {
            self.state.value = v.max(self.span.lo);
        }
    }

    /// Fold one direction's condition tags: boolean reads gate, analog reads
    /// above the span minimum nudge the value directly. Returns the permission
    /// flag and the accumulated nudge. A direction with no boolean read at
    /// all never grants permission.
    fn fold_conditions(
        &self,
        io: &mut dyn TagAccessor,
        tags: &[String],
        rate_per_cycle: f64,
    ) -> (bool, f64) {
        let mut allowed = match self.config.gating {
            GatingMode::Or => false,
            GatingMode::And => true,
        };
        let mut saw_boolean = false;
        let mut nudge = 0.0;

        for tag in tags {
            match io.read(tag) {
                TagValue::Bool { value } => {
                    saw_boolean = true;
                    allowed = match self.config.gating {
                        GatingMode::Or => allowed || value,
                        GatingMode::And => allowed && value,
                    };
                }
                other => {
                    if let Some(count) = other.as_real() {
                        if count > self.span.lo {
                            nudge += self.span.scaled_rate_of_change(count, rate_per_cycle);
                        }
                    }
                }
            }
        }

        if !saw_boolean {
            allowed = false;
        }
        (allowed, nudge)
    }

    /// Integrating ramp over elapsed wall-clock seconds. Boolean gating and
    /// analog nudging accumulate independently; both directions may apply in
    /// the same cycle and net out.
    fn resolve_integrating(&mut self, io: &mut dyn TagAccessor, elapsed: f64) {
        let (increase_allowed, increase_nudge) = self.fold_conditions(
            io,
            &self.config.increase_tags,
            self.config.increase_rate * elapsed,
        );
        let (decrease_allowed, decrease_nudge) = self.fold_conditions(
            io,
            &self.config.decrease_tags,
            self.config.decrease_rate * elapsed,
        );

        self.state.increase_allowed = increase_allowed;
        self.state.decrease_allowed = decrease_allowed;
        self.state.value += increase_nudge - decrease_nudge;

        if increase_allowed {
            self.state.value =
                (self.state.value + self.config.increase_rate * elapsed).min(self.span.hi);
        }
        if decrease_allowed {
            self.state.value =
                (self.state.value - self.config.decrease_rate * elapsed).max(self.span.lo);
        }

        trace!(
            input = %self.config.name,
            increase_allowed,
            decrease_allowed,
            value = self.state.value,
            "integrating update"
        );
    }
}

impl Device for AnalogInput {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn update(&mut self, io: &mut dyn TagAccessor, now: f64) {
        let elapsed = match self.state.last_update {
            Some(previous) => (now - previous).max(0.0),
            None => 0.0,
        };

        if !self.config.integrating && !self.config.reference_tags.is_empty() {
            self.resolve_passthrough(io);
        } else if self.config.integrating && self.has_condition_tags() {
            self.resolve_integrating(io, elapsed);
        } else if self.has_no_sources() {
            self.state.value = self.config.fixed_value;
        }
        // Otherwise: retain the previously held value.

        self.state.value = self.span.clamp(self.state.value);
        io.write(
            &self.config.feedback_tag,
            WriteValue::Count(self.state.value.round() as i32),
        );
        self.state.last_update = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Table;
    use fd_core::{RAW_HI, RAW_LO};

    fn config() -> AnalogInputConfig {
        AnalogInputConfig {
            name: "PT01".into(),
            feedback_tag: "PT01_FB".into(),
            reference_tags: vec![],
            increase_tags: vec![],
            decrease_tags: vec![],
            increase_rate: 10.0,
            decrease_rate: 10.0,
            integrating: false,
            gating: GatingMode::Or,
            fixed_value: 10_000.0,
            controller_address: "plc".into(),
        }
    }

    fn build(config: AnalogInputConfig) -> AnalogInput {
        AnalogInput::new(config).unwrap()
    }

    #[test]
    fn rejects_too_many_source_tags() {
        let mut c = config();
        c.reference_tags = vec!["a".into(), "b".into(), "c".into()];
        assert!(AnalogInput::new(c).is_err());

        let mut c = config();
        c.increase_tags = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        assert!(AnalogInput::new(c).is_err());
    }

    #[test]
    fn rejects_negative_rate() {
        let mut c = config();
        c.increase_rate = -1.0;
        assert!(AnalogInput::new(c).is_err());
    }

    #[test]
    fn fixed_mode_pins_configured_value() {
        let mut io = Table::default();
        let mut ai = build(config());
        for t in [0.0, 1.0, 60.0, 3600.0] {
            ai.update(&mut io, t);
            assert_eq!(io.count("PT01_FB"), Some(10_000));
        }
    }

    #[test]
    fn fixed_value_clamped_to_span() {
        let mut io = Table::default();
        let mut c = config();
        c.fixed_value = 50_000.0;
        let mut ai = build(c);
        ai.update(&mut io, 0.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_HI as i32));
    }

    #[test]
    fn passthrough_takes_higher_reference() {
        let mut io = Table::default();
        let mut c = config();
        c.reference_tags = vec!["REF_A".into(), "REF_B".into()];
        let mut ai = build(c);

        io.set_real("REF_A", 12_000.0);
        io.set_real("REF_B", 15_000.0);
        ai.update(&mut io, 0.0);
        assert_eq!(io.count("PT01_FB"), Some(15_000));

        io.set_real("REF_A", 20_000.0);
        ai.update(&mut io, 1.0);
        assert_eq!(io.count("PT01_FB"), Some(20_000));
    }

    #[test]
    fn passthrough_floors_at_span_minimum() {
        let mut io = Table::default();
        let mut c = config();
        c.reference_tags = vec!["REF_A".into()];
        let mut ai = build(c);

        io.set_real("REF_A", 100.0);
        ai.update(&mut io, 0.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32));
    }

    #[test]
    fn passthrough_with_one_reference_absent() {
        let mut io = Table::default();
        let mut c = config();
        c.reference_tags = vec!["REF_A".into(), "REF_B".into()];
        let mut ai = build(c);

        io.set_real("REF_B", 18_000.0);
        ai.update(&mut io, 0.0);
        assert_eq!(io.count("PT01_FB"), Some(18_000));
    }

    #[test]
    fn passthrough_with_both_absent_retains_value() {
        let mut io = Table::default();
        let mut c = config();
        c.reference_tags = vec!["REF_A".into(), "REF_B".into()];
        let mut ai = build(c);

        io.set_real("REF_A", 18_000.0);
        ai.update(&mut io, 0.0);
        io.remove("REF_A");
        ai.update(&mut io, 1.0);
        assert_eq!(io.count("PT01_FB"), Some(18_000));
    }

    #[test]
    fn passthrough_ignores_rate_limits() {
        let mut io = Table::default();
        let mut c = config();
        c.reference_tags = vec!["REF_A".into()];
        c.increase_rate = 1.0;
        let mut ai = build(c);

        io.set_real("REF_A", 7_000.0);
        ai.update(&mut io, 0.0);
        // Full-span jump in one cycle: passthrough does not ramp.
        io.set_real("REF_A", 31_000.0);
        ai.update(&mut io, 0.1);
        assert_eq!(io.count("PT01_FB"), Some(31_000));
    }

    #[test]
    fn or_gating_ramps_at_rate_times_elapsed() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.fixed_value = RAW_LO;
        let mut ai = build(c);

        io.set_bool("INC_A", true);
        ai.update(&mut io, 0.0); // first call, elapsed 0
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32));

        ai.update(&mut io, 2.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32 + 20));
        assert!(ai.state().increase_allowed);
    }

    #[test]
    fn and_gating_all_three_true_ramps() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.gating = GatingMode::And;
        c.increase_tags = vec!["INC_A".into(), "INC_B".into(), "INC_C".into()];
        c.fixed_value = RAW_LO;
        let mut ai = build(c);

        for tag in ["INC_A", "INC_B", "INC_C"] {
            io.set_bool(tag, true);
        }
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 2.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32 + 20));
    }

    #[test]
    fn and_gating_one_false_blocks_ramp() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.gating = GatingMode::And;
        c.increase_tags = vec!["INC_A".into(), "INC_B".into()];
        c.fixed_value = RAW_LO;
        let mut ai = build(c);

        io.set_bool("INC_A", true);
        io.set_bool("INC_B", false);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 2.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32));
        assert!(!ai.state().increase_allowed);
    }

    #[test]
    fn no_boolean_source_never_grants_permission() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.gating = GatingMode::And; // AND folds from true; the guard must still win
        c.increase_tags = vec!["INC_A".into()];
        c.fixed_value = 10_000.0;
        let mut ai = build(c);

        // INC_A is absent: no boolean read, no permission, no drift.
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 5.0);
        assert_eq!(io.count("PT01_FB"), Some(10_000));
        assert!(!ai.state().increase_allowed);
    }

    #[test]
    fn ramp_clamps_at_span_maximum() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.increase_rate = 1_000.0;
        c.fixed_value = RAW_HI - 500.0;
        let mut ai = build(c);

        io.set_bool("INC_A", true);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 10.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_HI as i32));
    }

    #[test]
    fn both_directions_net_out() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.decrease_tags = vec!["DEC_A".into()];
        c.increase_rate = 10.0;
        c.decrease_rate = 4.0;
        c.fixed_value = 10_000.0;
        let mut ai = build(c);

        io.set_bool("INC_A", true);
        io.set_bool("DEC_A", true);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 1.0);
        // +10 then −4 over one second.
        assert_eq!(io.count("PT01_FB"), Some(10_006));
        assert!(ai.state().increase_allowed);
        assert!(ai.state().decrease_allowed);
    }

    #[test]
    fn analog_condition_nudges_by_derated_rate() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.increase_rate = 10.0;
        c.fixed_value = 10_000.0;
        let mut ai = build(c);

        // Driving channel at full span: full rate, but no boolean source
        // means no gated ramp on top.
        io.set_channel("INC_A", RAW_HI, RAW_LO, RAW_HI);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 2.0);
        assert_eq!(io.count("PT01_FB"), Some(10_020));
        assert!(!ai.state().increase_allowed);
    }

    #[test]
    fn analog_condition_at_span_minimum_does_not_nudge() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.fixed_value = 10_000.0;
        let mut ai = build(c);

        io.set_channel("INC_A", RAW_LO, RAW_LO, RAW_HI);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 2.0);
        assert_eq!(io.count("PT01_FB"), Some(10_000));
    }

    #[test]
    fn mixed_bool_and_analog_sources_accumulate() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into(), "INC_B".into()];
        c.increase_rate = 10.0;
        c.fixed_value = 10_000.0;
        let mut ai = build(c);

        // Boolean grants the gated ramp; the analog channel at mid-span
        // independently nudges at half rate.
        io.set_bool("INC_A", true);
        io.set_channel("INC_B", (RAW_LO + RAW_HI) / 2.0, RAW_LO, RAW_HI);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 2.0);
        // +20 gated ramp, +10 derated nudge.
        assert_eq!(io.count("PT01_FB"), Some(10_030));
    }

    #[test]
    fn integrating_without_condition_tags_retains_value() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.reference_tags = vec!["REF_A".into()];
        c.fixed_value = 12_345.0;
        let mut ai = build(c);

        // Integrating flag set but no condition tags: rule 1 is skipped
        // (integrating), rule 3 is skipped (a reference is configured).
        io.set_real("REF_A", 30_000.0);
        ai.update(&mut io, 0.0);
        ai.update(&mut io, 5.0);
        assert_eq!(io.count("PT01_FB"), Some(12_345));
    }

    #[test]
    fn stalled_cycle_produces_one_catch_up_step() {
        let mut io = Table::default();
        let mut c = config();
        c.integrating = true;
        c.increase_tags = vec!["INC_A".into()];
        c.increase_rate = 10.0;
        c.fixed_value = RAW_LO;
        let mut ai = build(c);

        io.set_bool("INC_A", true);
        ai.update(&mut io, 0.0);
        // 60 s gap between cycles: elapsed time, not cycle count, drives
        // the ramp magnitude.
        ai.update(&mut io, 60.0);
        assert_eq!(io.count("PT01_FB"), Some(RAW_LO as i32 + 600));
    }
}
