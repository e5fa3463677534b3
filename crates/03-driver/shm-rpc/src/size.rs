//! Exact message sizing ahead of allocation.

use crate::codec::RpcCodec;
use crate::error::{RpcError, RpcResult};
use crate::header::MessageKind;
use crate::param::Param;
use crate::wire::{opaque_size, XDR_UNIT};

impl RpcCodec {
    /// Returns the exact number of bytes [`encode_request`] or
    /// [`encode_response`] writes for `params`, header included.
    ///
    /// A prog-mismatch reply is sized by passing its two range words as
    /// `Uint` parameters.
    ///
    /// [`encode_request`]: RpcCodec::encode_request
    /// [`encode_response`]: RpcCodec::encode_response
    pub fn estimate_size(&self, kind: MessageKind, params: &[Param<'_>]) -> RpcResult<usize> {
        let limit = self.config().max_message_len;
        let overflow = || RpcError::SizeOverflow { limit };
        let mut total = kind.header_len();
        for param in params {
            let size = param_size(param).ok_or_else(overflow)?;
            total = total.checked_add(size).ok_or_else(overflow)?;
        }
        if total > limit {
            return Err(overflow());
        }
        Ok(total)
    }
}

/// Encoded footprint of one parameter, or `None` when it cannot be encoded.
pub(crate) fn param_size(param: &Param<'_>) -> Option<usize> {
    match param {
        Param::Sint(_) | Param::Uint(_) => Some(XDR_UNIT),
        Param::String(text) => variable_size(text.len()),
        Param::Blob(bytes) => variable_size(bytes.len()),
    }
}

fn variable_size(len: usize) -> Option<usize> {
    // The length prefix is a u32 on the wire.
    u32::try_from(len).ok()?;
    opaque_size(len)
}
