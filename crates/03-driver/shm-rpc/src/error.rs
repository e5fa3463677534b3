use thiserror::Error;

use transport::TransportError;

use crate::header::{AcceptStatus, MessageKind};
use crate::param::ParamKind;

pub type RpcResult<T> = Result<T, RpcError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid codec configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("encoded message would exceed {limit} bytes")]
    SizeOverflow { limit: usize },

    #[error("message needs {required} bytes but the buffer holds {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("truncated message: need {needed} bytes at offset {offset}, message is {len} bytes")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("expected {expected} parameters, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("{remaining} bytes left after the last declared parameter")]
    TrailingData { remaining: usize },

    #[error("parameter {index} is {actual:?}, expected {expected:?}")]
    ParameterKindMismatch {
        index: usize,
        expected: ParamKind,
        actual: ParamKind,
    },

    #[error("operation not valid for accept status {status:?}")]
    InvalidStatusForOperation { status: AcceptStatus },

    #[error("expected a {expected:?} message, found {actual:?}")]
    WrongMessageKind {
        expected: MessageKind,
        actual: MessageKind,
    },

    #[error("unknown message type {0}")]
    UnknownMessageKind(u32),

    #[error("unknown accept status {0}")]
    UnknownAcceptStatus(u32),

    #[error("reply was not accepted (reply_stat {0})")]
    ReplyDenied(u32),

    #[error("unsupported RPC version {0}")]
    UnsupportedRpcVersion(u32),

    #[error("auth body of {len} bytes exceeds the protocol limit")]
    AuthTooLarge { len: usize },

    #[error("string parameter {index} is not valid UTF-8")]
    InvalidString { index: usize },
}
