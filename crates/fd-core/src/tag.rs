//! Typed tag values and the accessor capability.
//!
//! A tag is an opaque named value owned by the external controller channel.
//! The engine reads tags as a closed, typed enum where absence is a
//! first-class outcome: many optional inputs are legitimately unconfigured,
//! and a missing tag short-circuits a rule instead of raising an error.
//! A value of the wrong shape is treated exactly like an absent one.

use serde::{Deserialize, Serialize};

/// A structured analog read: the value plus its declared engineering span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogChannel {
    /// Current value in engineering units.
    pub value: f64,
    /// Declared engineering minimum.
    pub min: f64,
    /// Declared engineering maximum.
    pub max: f64,
}

impl AnalogChannel {
    /// Create a channel read.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        Self { value, min, max }
    }
}

/// Typed, possibly-absent value read from a named tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TagValue {
    /// Boolean tag (commands, permissives, indications).
    Bool { value: bool },
    /// Plain real-valued tag.
    Real { value: f64 },
    /// Analog channel carrying its engineering span.
    Channel { channel: AnalogChannel },
    /// Tag not found or not wired. Not an error.
    Absent,
}

impl TagValue {
    /// Boolean reading, `None` on absence or type mismatch.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool { value } => Some(*value),
            _ => None,
        }
    }

    /// Real reading; a channel contributes its value. `None` on absence
    /// or a boolean read.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real { value } => Some(*value),
            Self::Channel { channel } => Some(channel.value),
            _ => None,
        }
    }

    /// Structured channel reading, `None` on absence or type mismatch.
    pub fn as_channel(&self) -> Option<AnalogChannel> {
        match self {
            Self::Channel { channel } => Some(*channel),
            _ => None,
        }
    }

    /// True if the tag was not found or had an unusable shape.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// The only shapes the engine writes back: indications and feedback counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WriteValue {
    Bool(bool),
    Count(i32),
}

/// Read/write capability over named tags, implemented by the external
/// controller channel (or an in-memory table for tests).
///
/// `read` must return [`TagValue::Absent`] for an unknown name rather than
/// erroring; `write` is best-effort and failures are the implementor's
/// concern. The engine never retries.
pub trait TagAccessor {
    /// Read the named tag.
    fn read(&mut self, name: &str) -> TagValue;

    /// Write the named tag.
    fn write(&mut self, name: &str, value: WriteValue);
}
