//! ONC-RPC marshalling for messages exchanged over the shared-memory channel.
//!
//! The crate converts between typed parameter lists and XDR-framed call and
//! reply messages:
//! * [`RpcCodec`] – sizes messages ahead of allocation and encodes calls and
//!   replies into caller-supplied buffers (or freshly allocated [`MessageBuf`]s).
//! * [`decode_procedure`], [`decode_status`], [`decode_versions`],
//!   [`decode_args`], [`decode_values`] – bounds-checked decoders whose string
//!   and blob outputs borrow the message bytes.
//! * [`message_kind`] / [`transaction_id`] – header accessors used to route a
//!   message before decoding it.
//!
//! Typical call path: `estimate_size` → obtain a buffer from the channel →
//! `encode_request`. Handler path: `decode_procedure` → `decode_args` → run
//! the handler → `encode_response` with the request's xid.
//!
//! [`MessageBuf`]: transport::MessageBuf

#![allow(missing_docs)]

mod codec;
mod config;
mod decode;
mod encode;
mod error;
mod header;
mod param;
mod size;
pub mod wire;

pub use codec::RpcCodec;
pub use config::{CodecConfig, DEFAULT_MAX_MESSAGE_LEN};
pub use decode::{
    decode_args, decode_procedure, decode_status, decode_values, decode_versions, DecodedValues,
};
pub use error::{RpcError, RpcResult};
pub use header::{
    message_kind, transaction_id, AcceptStatus, MessageKind, Procedure, VersionRange,
    AUTH_NULL, CALL_HEADER_LEN, MAX_AUTH_BYTES, REPLY_HEADER_LEN, RPC_VERSION,
};
pub use param::{Param, ParamKind, ParamOut};
