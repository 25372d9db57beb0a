//! Shared in-memory tag table for device unit tests.

use std::collections::BTreeMap;

use fd_core::{AnalogChannel, TagAccessor, TagValue, WriteValue};

/// Minimal in-memory accessor: unknown names read as absent, counts are
/// stored back as real values.
#[derive(Debug, Default)]
pub(crate) struct Table(pub(crate) BTreeMap<String, TagValue>);

impl Table {
    pub(crate) fn set_bool(&mut self, name: &str, value: bool) {
        self.0.insert(name.into(), TagValue::Bool { value });
    }

    pub(crate) fn set_real(&mut self, name: &str, value: f64) {
        self.0.insert(name.into(), TagValue::Real { value });
    }

    pub(crate) fn set_channel(&mut self, name: &str, value: f64, min: f64, max: f64) {
        self.0.insert(
            name.into(),
            TagValue::Channel {
                channel: AnalogChannel::new(value, min, max),
            },
        );
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub(crate) fn bool(&self, name: &str) -> bool {
        self.0
            .get(name)
            .and_then(TagValue::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn real(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(TagValue::as_real)
    }

    pub(crate) fn count(&self, name: &str) -> Option<i32> {
        self.real(name).map(|v| v as i32)
    }
}

impl TagAccessor for Table {
    fn read(&mut self, name: &str) -> TagValue {
        self.0.get(name).copied().unwrap_or(TagValue::Absent)
    }

    fn write(&mut self, name: &str, value: WriteValue) {
        let value = match value {
            WriteValue::Bool(value) => TagValue::Bool { value },
            WriteValue::Count(c) => TagValue::Real {
                value: f64::from(c),
            },
        };
        self.0.insert(name.into(), value);
    }
}
