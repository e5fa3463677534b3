//! Codec configuration.

use crate::error::{RpcError, RpcResult};
use crate::header::CALL_HEADER_LEN;

/// Largest message size the legacy signed size report could express.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = i32::MAX as usize;

/// Limits applied while sizing and encoding messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest message the channel can carry, header included.
    pub max_message_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}

impl CodecConfig {
    pub fn with_max_message_len(max_message_len: usize) -> Self {
        Self { max_message_len }
    }

    pub fn validate(&self) -> RpcResult<()> {
        if self.max_message_len < CALL_HEADER_LEN {
            return Err(RpcError::InvalidConfig(
                "max_message_len must hold at least a call header",
            ));
        }
        Ok(())
    }
}
