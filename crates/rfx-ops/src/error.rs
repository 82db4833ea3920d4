//! Error types for effect rendering.

use thiserror::Error;

/// Error type for pixel operators and effects.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parameter name not known to the parameter record.
    #[error("unknown parameter '{name}' for {record}")]
    UnknownParameter {
        /// Parameter record type name.
        record: &'static str,
        /// Requested parameter name.
        name: String,
    },

    /// Requested capability is not available.
    ///
    /// Raised by `Effect::launch_configuration` when no configuration
    /// dialog exists for the effect. Rendering never produces this.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Buffer or region error from the core types.
    #[error(transparent)]
    Core(#[from] rfx_core::Error),
}

impl OpsError {
    /// Returns `true` for the "configuration UI unavailable" condition.
    #[inline]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

/// Result type for effect operations.
pub type OpsResult<T> = Result<T, OpsError>;
