//! Decoders for received messages.
//!
//! Every entry point checks the call/reply discriminant before reading
//! anything kind-specific, and every read is bounds-checked against the
//! message length. Decoded strings and blobs borrow the message bytes.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{RpcError, RpcResult};
use crate::header::{self, AcceptStatus, MessageKind, Procedure, VersionRange};
use crate::param::{Param, ParamKind, ParamOut};
use crate::wire::XdrReader;

/// Decoded values returned by [`decode_values`].
pub type DecodedValues<'a> = SmallVec<[Param<'a>; 8]>;

/// Reads the procedure descriptor of a call.
pub fn decode_procedure(msg: &[u8]) -> RpcResult<Procedure> {
    header::read_call(msg)
        .map(|(procedure, _)| procedure)
        .inspect_err(|err| debug!(%err, "decode_procedure rejected message"))
}

/// Reads the accept status of a reply.
pub fn decode_status(msg: &[u8]) -> RpcResult<AcceptStatus> {
    header::read_reply(msg)
        .map(|(status, _)| status)
        .inspect_err(|err| debug!(%err, "decode_status rejected message"))
}

/// Reads the supported version range of a prog-mismatch reply.
pub fn decode_versions(msg: &[u8]) -> RpcResult<VersionRange> {
    read_versions(msg).inspect_err(|err| debug!(%err, "decode_versions rejected message"))
}

fn read_versions(msg: &[u8]) -> RpcResult<VersionRange> {
    let (status, mut reader) = header::read_reply(msg)?;
    if status != AcceptStatus::ProgMismatch {
        return Err(RpcError::InvalidStatusForOperation { status });
    }
    let min = reader.get_u32()?;
    let max = reader.get_u32()?;
    Ok(VersionRange::new(min, max))
}

/// Fills `slots` positionally from the body of `msg`.
///
/// `kind` selects the call or reply layout; a reply must carry `Success`.
/// On error, slots before the failing position may already hold decoded
/// values; the failing slot and the ones after it are left untouched.
/// Bytes left over after the last slot are reported as
/// [`RpcError::TrailingData`].
pub fn decode_args<'a>(
    msg: &'a [u8],
    kind: MessageKind,
    slots: &mut [ParamOut<'_, 'a>],
) -> RpcResult<()> {
    let mut reader = body_reader(msg, kind)?;
    for (index, slot) in slots.iter_mut().enumerate() {
        let result = match slot {
            ParamOut::Sint(dst) => reader.get_i32().map(|value| **dst = value),
            ParamOut::Uint(dst) => reader.get_u32().map(|value| **dst = value),
            ParamOut::String(dst) => read_str(&mut reader, index).map(|value| **dst = value),
            ParamOut::Blob(dst) => reader.get_opaque().map(|value| **dst = value),
        };
        result.inspect_err(|err| debug!(index, %err, "decode_args failed"))?;
    }
    finish(&reader, slots.len())
}

/// Decodes values of the given `kinds` from the body of `msg`.
///
/// Same checks as [`decode_args`], returning the values instead of writing
/// through slots.
pub fn decode_values<'a>(
    msg: &'a [u8],
    kind: MessageKind,
    kinds: &[ParamKind],
) -> RpcResult<DecodedValues<'a>> {
    let mut reader = body_reader(msg, kind)?;
    let mut values = DecodedValues::with_capacity(kinds.len());
    for (index, kind) in kinds.iter().enumerate() {
        let value = read_param(&mut reader, index, *kind)
            .inspect_err(|err| debug!(index, %err, "decode_values failed"))?;
        values.push(value);
    }
    finish(&reader, kinds.len())?;
    Ok(values)
}

fn body_reader(msg: &[u8], kind: MessageKind) -> RpcResult<XdrReader<'_>> {
    let reader = match kind {
        MessageKind::Call => header::read_call(msg).map(|(_, reader)| reader),
        MessageKind::Reply => header::read_reply(msg).and_then(|(status, reader)| {
            if status.is_success() {
                Ok(reader)
            } else {
                Err(RpcError::InvalidStatusForOperation { status })
            }
        }),
    };
    reader.inspect_err(|err| debug!(?kind, %err, "message header rejected"))
}

fn read_param<'a>(reader: &mut XdrReader<'a>, index: usize, kind: ParamKind) -> RpcResult<Param<'a>> {
    Ok(match kind {
        ParamKind::Sint => Param::Sint(reader.get_i32()?),
        ParamKind::Uint => Param::Uint(reader.get_u32()?),
        ParamKind::String => Param::String(read_str(reader, index)?),
        ParamKind::Blob => Param::Blob(reader.get_opaque()?),
    })
}

fn read_str<'a>(reader: &mut XdrReader<'a>, index: usize) -> RpcResult<&'a str> {
    let bytes = reader.get_opaque()?;
    std::str::from_utf8(bytes).map_err(|_| RpcError::InvalidString { index })
}

fn finish(reader: &XdrReader<'_>, declared: usize) -> RpcResult<()> {
    if !reader.is_empty() {
        let err = RpcError::TrailingData {
            remaining: reader.remaining(),
        };
        debug!(declared, %err, "message carries more parameters than declared");
        return Err(err);
    }
    trace!(declared, bytes = reader.position(), "decoded rpc body");
    Ok(())
}
