//! Two-position (open/closed) valve state machine.
//!
//! Models a switching valve driven by an energize command. Real limit
//! switches cannot report an indication mid-travel, so every command edge
//! opens a "both indications false" window for the configured travel delay
//! before the settled indication pair is reported.

use fd_core::{TagAccessor, WriteValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::Device;
use crate::error::{DeviceError, DeviceResult};

/// Valve resting position, which fixes the energize direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValvePolarity {
    /// Energize to open: command true → open indication.
    NormallyClosed,
    /// Energize to close: command true → closed indication.
    NormallyOpen,
}

fn default_travel_delay() -> f64 {
    1.0
}

/// Immutable switching valve configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchingValveConfig {
    /// Device name.
    pub name: String,
    /// Energize command tag.
    pub command_tag: String,
    /// Optional auxiliary command tag. The configuration layer derives it
    /// from the site's tag naming pattern; the engine ORs its reading with
    /// the primary command and otherwise treats it opaquely.
    #[serde(default)]
    pub aux_command_tag: Option<String>,
    /// Open limit switch indication tag.
    pub open_ind_tag: String,
    /// Closed limit switch indication tag.
    pub closed_ind_tag: String,
    /// Resting position / energize direction.
    pub polarity: ValvePolarity,
    /// Travel time before an end-of-travel indication, seconds.
    #[serde(default = "default_travel_delay")]
    pub travel_delay_s: f64,
    /// Opaque routing key for the external controller channel.
    pub controller_address: String,
}

/// Mutable switching valve runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchingValveState {
    /// Command observed on the previous cycle.
    pub last_command: bool,
    /// Open limit switch indication.
    pub open_ind: bool,
    /// Closed limit switch indication.
    pub closed_ind: bool,
    /// Time at which the current travel completes, seconds.
    pub travel_deadline: f64,
}

/// Switching valve device: configuration plus runtime state.
#[derive(Debug, Clone)]
pub struct SwitchingValve {
    config: SwitchingValveConfig,
    state: SwitchingValveState,
}

impl SwitchingValve {
    /// Build a valve in its de-energized resting position, settled.
    pub fn new(config: SwitchingValveConfig) -> DeviceResult<Self> {
        if !(config.travel_delay_s > 0.0) {
            return Err(DeviceError::InvalidConfig {
                what: "travel delay must be positive",
            });
        }
        let (open_ind, closed_ind) = settled_indications(config.polarity, false);
        Ok(Self {
            config,
            state: SwitchingValveState {
                last_command: false,
                open_ind,
                closed_ind,
                travel_deadline: 0.0,
            },
        })
    }

    /// Current runtime state.
    pub fn state(&self) -> &SwitchingValveState {
        &self.state
    }

    /// Device configuration.
    pub fn config(&self) -> &SwitchingValveConfig {
        &self.config
    }
}

/// Indication pair for a settled valve: polarity and command determine it.
fn settled_indications(polarity: ValvePolarity, command: bool) -> (bool, bool) {
    match polarity {
        ValvePolarity::NormallyClosed => (command, !command),
        ValvePolarity::NormallyOpen => (!command, command),
    }
}

impl Device for SwitchingValve {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn update(&mut self, io: &mut dyn TagAccessor, now: f64) {
        // Absent command reads are de-energized, not an error.
        let mut command = io.read(&self.config.command_tag).as_bool().unwrap_or(false);
        if let Some(aux) = &self.config.aux_command_tag {
            command = command || io.read(aux).as_bool().unwrap_or(false);
        }

        if command != self.state.last_command {
            // Command edge: drop both indications and arm the travel delay.
            self.state.open_ind = false;
            self.state.closed_ind = false;
            self.state.travel_deadline = now + self.config.travel_delay_s;
            self.state.last_command = command;
            debug!(
                valve = %self.config.name,
                command,
                deadline = self.state.travel_deadline,
                "command edge, valve in travel"
            );
        } else if now >= self.state.travel_deadline {
            // Deadline is not re-armed while the command holds steady.
            let (open_ind, closed_ind) = settled_indications(self.config.polarity, command);
            self.state.open_ind = open_ind;
            self.state.closed_ind = closed_ind;
        }

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
