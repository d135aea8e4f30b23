use thiserror::Error;

pub type LizzyResult<T> = Result<T, LizzyError>;

/// Error kinds per the engine's §7 error-handling design: configuration
/// errors are recoverable by the caller, topological/runtime/numeric
/// errors are fatal to the current model.
#[derive(Error, Debug)]
pub enum LizzyError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
