use thiserror::Error;

pub type FdResult<T> = Result<T, FdError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FdError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
