//! Error types for device construction.
//!
//! Device updates themselves never fail: every update path terminates in a
//! defined output (new value, retained value, or fixed value). Errors exist
//! only at construction time, when configuration is validated.

use fd_core::FdError;
use thiserror::Error;

/// Errors that can occur while building a device from configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },
}

pub type DeviceResult<T> = Result<T, DeviceError>;

impl From<DeviceError> for FdError {
    fn from(e: DeviceError) -> Self {
        match e {
            DeviceError::InvalidConfig { what } => FdError::InvalidArg { what },
        }
    }
}
