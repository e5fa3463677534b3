//! Request and response encoders.
//!
//! Both encoders size the message first and refuse to touch the buffer when
//! it is too small, so a failed encode never leaves a partial message.

use tracing::{debug, trace};

use crate::codec::RpcCodec;
use crate::error::{RpcError, RpcResult};
use crate::header::{self, AcceptStatus, MessageKind, Procedure, VersionRange};
use crate::param::{Param, ParamKind};
use crate::wire::XdrWriter;

impl RpcCodec {
    /// Writes a complete call for `procedure` into `buf`.
    ///
    /// `xid` is echoed by the peer's reply; pass 0 when the channel does not
    /// match replies to calls. Returns the number of bytes written.
    pub fn encode_request(
        &self,
        xid: u32,
        procedure: Procedure,
        params: &[Param<'_>],
        buf: &mut [u8],
    ) -> RpcResult<usize> {
        let required = self.estimate_size(MessageKind::Call, params)?;
        ensure_capacity(required, buf.len())?;

        let mut writer = XdrWriter::new(buf);
        header::write_call(&mut writer, xid, procedure)?;
        write_params(&mut writer, params)?;
        debug_assert_eq!(writer.position(), required);

        trace!(
            xid,
            program = procedure.program,
            version = procedure.version,
            procedure = procedure.procedure,
            params = params.len(),
            bytes = required,
            "encoded rpc call"
        );
        Ok(required)
    }

    /// Writes a complete reply carrying `status` into `buf`.
    ///
    /// * `Success` encodes `params` as results.
    /// * `ProgMismatch` requires exactly `[Uint(min), Uint(max)]`.
    /// * Any other status carries no body, so `params` must be empty.
    pub fn encode_response(
        &self,
        xid: u32,
        status: AcceptStatus,
        params: &[Param<'_>],
        buf: &mut [u8],
    ) -> RpcResult<usize> {
        match status {
            AcceptStatus::Success => {}
            AcceptStatus::ProgMismatch => {
                version_range(params).inspect_err(|err| {
                    debug!(xid, %err, "rejected prog-mismatch body");
                })?;
            }
            _ if !params.is_empty() => {
                let err = RpcError::ParameterCountMismatch {
                    expected: 0,
                    actual: params.len(),
                };
                debug!(xid, ?status, %err, "rejected reply body");
                return Err(err);
            }
            _ => {}
        }

        let required = self.estimate_size(MessageKind::Reply, params)?;
        ensure_capacity(required, buf.len())?;

        let mut writer = XdrWriter::new(buf);
        header::write_reply(&mut writer, xid, status)?;
        write_params(&mut writer, params)?;
        debug_assert_eq!(writer.position(), required);

        trace!(xid, ?status, params = params.len(), bytes = required, "encoded rpc reply");
        Ok(required)
    }

    /// Writes a prog-mismatch reply advertising `range`.
    pub fn encode_prog_mismatch(
        &self,
        xid: u32,
        range: VersionRange,
        buf: &mut [u8],
    ) -> RpcResult<usize> {
        self.encode_response(
            xid,
            AcceptStatus::ProgMismatch,
            &[Param::Uint(range.min), Param::Uint(range.max)],
            buf,
        )
    }
}

fn ensure_capacity(required: usize, capacity: usize) -> RpcResult<()> {
    if capacity < required {
        return Err(RpcError::BufferTooSmall { required, capacity });
    }
    Ok(())
}

fn version_range(params: &[Param<'_>]) -> RpcResult<VersionRange> {
    match params {
        [Param::Uint(min), Param::Uint(max)] => Ok(VersionRange::new(*min, *max)),
        [first, second] => {
            let (index, actual) = if first.kind() != ParamKind::Uint {
                (0, first.kind())
            } else {
                (1, second.kind())
            };
            Err(RpcError::ParameterKindMismatch {
                index,
                expected: ParamKind::Uint,
                actual,
            })
        }
        _ => Err(RpcError::ParameterCountMismatch {
            expected: 2,
            actual: params.len(),
        }),
    }
}

fn write_params(writer: &mut XdrWriter<'_>, params: &[Param<'_>]) -> RpcResult<()> {
    for param in params {
        match param {
            Param::Sint(value) => writer.put_i32(*value)?,
            Param::Uint(value) => writer.put_u32(*value)?,
            Param::String(text) => writer.put_opaque(text.as_bytes())?,
            Param::Blob(bytes) => writer.put_opaque(bytes)?,
        }
    }
    Ok(())
}
