use fd_devices::DeviceError;
use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Duplicate device name: {name}")]
    DuplicateDevice { name: String },

    #[error("Device configuration error: {0}")]
    Device(#[from] DeviceError),
}
