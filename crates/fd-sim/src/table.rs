//! In-memory tag table.
//!
//! Implements the [`TagAccessor`] capability over a plain map, standing in
//! for the real controller channel. Unknown names read as absent; feedback
//! counts written by devices are stored back as real values so other devices
//! (and assertions) can read them in the same table.

use std::collections::BTreeMap;

use fd_core::{AnalogChannel, TagAccessor, TagValue, WriteValue};

/// Name-keyed store of typed tag values.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    tags: BTreeMap<String, TagValue>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a boolean tag.
    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.tags.insert(name.into(), TagValue::Bool { value });
    }

    /// Seed a real-valued tag.
    pub fn set_real(&mut self, name: impl Into<String>, value: f64) {
        self.tags.insert(name.into(), TagValue::Real { value });
    }

    /// Seed an analog channel tag with its declared engineering span.
    pub fn set_channel(&mut self, name: impl Into<String>, value: f64, min: f64, max: f64) {
        self.tags.insert(
            name.into(),
            TagValue::Channel {
                channel: AnalogChannel::new(value, min, max),
            },
        );
    }

    /// Remove a tag; subsequent reads see it as absent.
    pub fn remove(&mut self, name: &str) {
        self.tags.remove(name);
    }

    /// Current value of a tag without consuming a read.
    pub fn get(&self, name: &str) -> TagValue {
        self.tags.get(name).copied().unwrap_or(TagValue::Absent)
    }

    /// Boolean reading of a tag; absent reads as false.
    pub fn bool(&self, name: &str) -> bool {
        self.get(name).as_bool().unwrap_or(false)
    }

    /// Real reading of a tag.
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name).as_real()
    }

    /// Real reading of a tag truncated to a count.
    pub fn count(&self, name: &str) -> Option<i32> {
        self.real(name).map(|v| v as i32)
    }

    /// Number of tags in the table.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagAccessor for TagTable {
    fn read(&mut self, name: &str) -> TagValue {
        self.get(name)
    }

    fn write(&mut self, name: &str, value: WriteValue) {
        let value = match value {
            WriteValue::Bool(value) => TagValue::Bool { value },
            WriteValue::Count(c) => TagValue::Real {
                value: f64::from(c),
            },
        };
        self.tags.insert(name.into(), value);
    }
}
