//! Handler error types

use crate::events::ServerEvent;
use relay_core::DomainError;
use thiserror::Error;

/// Handler error type
///
/// Every variant maps to a scoped `error` event on the originating
/// connection; handler failures never terminate the transport.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame parsed but the payload failed a precondition
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Domain rule rejected the operation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Stable error code carried in the `error` event
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::Domain(e) => e.code(),
        }
    }

    /// Build the scoped `error` event for the offending connection
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::Error {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
