//! Error types for ringarc.
//!
//! Both primitives are infallible on their hot paths — errors surface
//! only at construction time, where capacity or handle shape can
//! actually be checked before any atomic state exists.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RingArcError>;

#[derive(Error, Debug)]
pub enum RingArcError {
    #[error("invalid capacity: {message}")]
    InvalidCapacity { message: String },

    #[error("handle bit pattern (1, 0) is reserved as the AtomicArc sentinel")]
    SentinelCollision,
}

impl RingArcError {
    pub fn invalid_capacity(message: impl Into<String>) -> Self {
        Self::InvalidCapacity { message: message.into() }
    }
}
