//! Explicit device registry.
//!
//! Devices are keyed by name and updated in insertion order, which is the
//! caller-defined ordering the engine otherwise refuses to guarantee. A
//! device whose output feeds another device's input should be registered
//! first if strict same-cycle consistency is wanted.

use std::collections::BTreeMap;

use fd_core::TagAccessor;
use fd_devices::{Device, DeviceConfig};
use tracing::trace;

use crate::error::{SimError, SimResult};

/// Insertion-ordered collection of devices with name-keyed lookup.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Vec<Box<dyn Device>>,
    index: BTreeMap<String, usize>,
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("names", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from pre-validated configuration records, preserving
    /// their order.
    pub fn from_configs(configs: Vec<DeviceConfig>) -> SimResult<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.insert(config.build()?)?;
        }
        Ok(registry)
    }

    /// Register a device. Names must be unique.
    pub fn insert(&mut self, device: Box<dyn Device>) -> SimResult<()> {
        let name = device.name().to_owned();
        if self.index.contains_key(&name) {
            return Err(SimError::DuplicateDevice { name });
        }
        self.index.insert(name, self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    /// Look up a device by name.
    pub fn get(&self, name: &str) -> Option<&dyn Device> {
        self.index.get(name).map(|&i| self.devices[i].as_ref())
    }

    /// Device names in update order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.name())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Update every device once at the given instant, in insertion order.
    pub fn update_all(&mut self, io: &mut dyn TagAccessor, now: f64) {
        for device in &mut self.devices {
            trace!(device = device.name(), now, "device update");
            device.update(&mut *io, now);
        }
    }
}
