use tracing::trace;
use transport::MessageBuf;

use crate::config::CodecConfig;
use crate::error::RpcResult;
use crate::header::{AcceptStatus, MessageKind, Procedure};
use crate::param::Param;

/// Sizes and encodes messages under a [`CodecConfig`].
///
/// Every size it reports and every message it writes is capped at the
/// configured `max_message_len`. The `build_*` helpers allocate a
/// [`MessageBuf`] of exactly the estimated size and publish the encoded bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RpcCodec {
    config: CodecConfig,
}

impl RpcCodec {
    pub fn new(config: CodecConfig) -> RpcResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Estimates, allocates and encodes a call in one step.
    pub fn build_request(
        &self,
        xid: u32,
        procedure: Procedure,
        params: &[Param<'_>],
    ) -> RpcResult<MessageBuf> {
        let required = self.estimate_size(MessageKind::Call, params)?;
        let mut buf = MessageBuf::with_capacity(required)?;
        let written = self.encode_request(xid, procedure, params, buf.writable())?;
        buf.set_len(written)?;
        trace!(xid, bytes = written, "built rpc call buffer");
        Ok(buf)
    }

    /// Estimates, allocates and encodes a reply in one step.
    pub fn build_response(
        &self,
        xid: u32,
        status: AcceptStatus,
        params: &[Param<'_>],
    ) -> RpcResult<MessageBuf> {
        let required = self.estimate_size(MessageKind::Reply, params)?;
        let mut buf = MessageBuf::with_capacity(required)?;
        let written = self.encode_response(xid, status, params, buf.writable())?;
        buf.set_len(written)?;
        trace!(xid, ?status, bytes = written, "built rpc reply buffer");
        Ok(buf)
    }
}
