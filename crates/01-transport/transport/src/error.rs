//! Error handling helpers for the transport crate.
//!
//! The buffer layer keeps its error surface small: allocation failures and
//! attempts to publish more bytes than a buffer holds.

use std::fmt;

/// Convenience result alias for fallible transport operations.
pub type TransportResult<T, E = TransportError> = Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors surfaced by low-level transport helpers.
pub enum TransportError {
    /// Allocation of a message region failed for the given size.
    AllocationFailed { size: usize },
    /// A filled length larger than the buffer capacity was requested.
    LengthOutOfRange { len: usize, capacity: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::AllocationFailed { size } => {
                write!(f, "failed to allocate message region of {size} bytes")
            }
            TransportError::LengthOutOfRange { len, capacity } => {
                write!(
                    f,
                    "filled length {len} exceeds message buffer capacity {capacity}"
                )
            }
        }
    }
}

impl std::error::Error for TransportError {}
