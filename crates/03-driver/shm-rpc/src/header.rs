//! ONC-RPC message headers.
//!
//! ```text
//! call  : xid | CALL  | rpcvers=2 | prog | vers | proc | cred | verf | args...
//! reply : xid | REPLY | MSG_ACCEPTED | verf | accept_stat | [low | high] | results...
//!
//! cred/verf : flavor (u32) | opaque body (len-prefixed, <= 400 bytes)
//! ```
//!
//! Encoders always emit `AUTH_NULL` credentials and verifiers with empty
//! bodies. Decoders walk whatever auth blocks the peer sent.

use crate::error::{RpcError, RpcResult};
use crate::wire::{XdrReader, XdrWriter, XDR_UNIT};

/// ONC-RPC protocol version carried in every call.
pub const RPC_VERSION: u32 = 2;
/// Null authentication flavor; the transport negotiates no credentials.
pub const AUTH_NULL: u32 = 0;
/// Upper bound on an opaque auth body.
pub const MAX_AUTH_BYTES: usize = 400;

const MSG_ACCEPTED: u32 = 0;

/// Bytes of a call header with null credentials and verifier.
pub const CALL_HEADER_LEN: usize = 10 * XDR_UNIT;
/// Bytes of an accepted reply header with a null verifier.
pub const REPLY_HEADER_LEN: usize = 6 * XDR_UNIT;

/// Discriminant separating calls from replies.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Call = 0,
    Reply = 1,
}

impl MessageKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(MessageKind::Call),
            1 => Some(MessageKind::Reply),
            _ => None,
        }
    }

    /// Header bytes this transport writes for the kind.
    pub fn header_len(self) -> usize {
        match self {
            MessageKind::Call => CALL_HEADER_LEN,
            MessageKind::Reply => REPLY_HEADER_LEN,
        }
    }
}

/// Outcome of an accepted call.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcceptStatus {
    /// Executed successfully; results follow.
    Success = 0,
    /// Program not exported by the remote side.
    ProgUnavail = 1,
    /// Program version unsupported; the supported range follows.
    ProgMismatch = 2,
    /// Procedure not provided by the program.
    ProcUnavail = 3,
    /// Arguments could not be decoded.
    GarbageArgs = 4,
    /// Remote failure unrelated to the arguments.
    SystemErr = 5,
}

impl AcceptStatus {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(AcceptStatus::Success),
            1 => Some(AcceptStatus::ProgUnavail),
            2 => Some(AcceptStatus::ProgMismatch),
            3 => Some(AcceptStatus::ProcUnavail),
            4 => Some(AcceptStatus::GarbageArgs),
            5 => Some(AcceptStatus::SystemErr),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == AcceptStatus::Success
    }
}

/// Identifies the remote operation a call invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Procedure {
    pub program: u32,
    pub version: u32,
    pub procedure: u32,
}

impl Procedure {
    pub const fn new(program: u32, version: u32, procedure: u32) -> Self {
        Self {
            program,
            version,
            procedure,
        }
    }
}

/// Versions of a program the remote side supports, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub min: u32,
    pub max: u32,
}

impl VersionRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: u32) -> bool {
        version >= self.min && version <= self.max
    }
}

/// Reads the message type of `msg`.
pub fn message_kind(msg: &[u8]) -> RpcResult<MessageKind> {
    let mut reader = XdrReader::new(msg);
    read_kind(&mut reader).map(|(_, kind)| kind)
}

/// Reads the transaction id shared by a call and its reply.
pub fn transaction_id(msg: &[u8]) -> RpcResult<u32> {
    XdrReader::new(msg).get_u32()
}

fn read_kind(reader: &mut XdrReader<'_>) -> RpcResult<(u32, MessageKind)> {
    let xid = reader.get_u32()?;
    let raw = reader.get_u32()?;
    let kind = MessageKind::from_u32(raw).ok_or(RpcError::UnknownMessageKind(raw))?;
    Ok((xid, kind))
}

/// Positions a reader after `xid | msg_type`, failing unless the message is
/// of the `expected` kind.
pub(crate) fn expect_kind<'a>(msg: &'a [u8], expected: MessageKind) -> RpcResult<XdrReader<'a>> {
    let mut reader = XdrReader::new(msg);
    let (_, actual) = read_kind(&mut reader)?;
    if actual != expected {
        return Err(RpcError::WrongMessageKind { expected, actual });
    }
    Ok(reader)
}

/// Parses a call header, leaving the reader at the first argument.
pub(crate) fn read_call<'a>(msg: &'a [u8]) -> RpcResult<(Procedure, XdrReader<'a>)> {
    let mut reader = expect_kind(msg, MessageKind::Call)?;
    let rpcvers = reader.get_u32()?;
    if rpcvers != RPC_VERSION {
        return Err(RpcError::UnsupportedRpcVersion(rpcvers));
    }
    let procedure = Procedure {
        program: reader.get_u32()?,
        version: reader.get_u32()?,
        procedure: reader.get_u32()?,
    };
    skip_auth(&mut reader)?;
    skip_auth(&mut reader)?;
    Ok((procedure, reader))
}

/// Parses an accepted reply header, leaving the reader just past
/// `accept_stat`.
pub(crate) fn read_reply<'a>(msg: &'a [u8]) -> RpcResult<(AcceptStatus, XdrReader<'a>)> {
    let mut reader = expect_kind(msg, MessageKind::Reply)?;
    let reply_stat = reader.get_u32()?;
    if reply_stat != MSG_ACCEPTED {
        return Err(RpcError::ReplyDenied(reply_stat));
    }
    skip_auth(&mut reader)?;
    let raw = reader.get_u32()?;
    let status = AcceptStatus::from_u32(raw).ok_or(RpcError::UnknownAcceptStatus(raw))?;
    Ok((status, reader))
}

fn skip_auth(reader: &mut XdrReader<'_>) -> RpcResult<()> {
    let _flavor = reader.get_u32()?;
    let len = reader.get_u32()? as usize;
    if len > MAX_AUTH_BYTES {
        return Err(RpcError::AuthTooLarge { len });
    }
    reader.get_opaque_body(len)?;
    Ok(())
}

fn put_null_auth(writer: &mut XdrWriter<'_>) -> RpcResult<()> {
    writer.put_u32(AUTH_NULL)?;
    writer.put_u32(0)
}

pub(crate) fn write_call(writer: &mut XdrWriter<'_>, xid: u32, procedure: Procedure) -> RpcResult<()> {
    writer.put_u32(xid)?;
    writer.put_u32(MessageKind::Call as u32)?;
    writer.put_u32(RPC_VERSION)?;
    writer.put_u32(procedure.program)?;
    writer.put_u32(procedure.version)?;
    writer.put_u32(procedure.procedure)?;
    put_null_auth(writer)?;
    put_null_auth(writer)
}

pub(crate) fn write_reply(writer: &mut XdrWriter<'_>, xid: u32, status: AcceptStatus) -> RpcResult<()> {
    writer.put_u32(xid)?;
    writer.put_u32(MessageKind::Reply as u32)?;
    writer.put_u32(MSG_ACCEPTED)?;
    put_null_auth(writer)?;
    writer.put_u32(status as u32)
}
