//! Typed procedure parameters.
//!
//! The wire carries no per-field type tags: the ordered list of kinds the
//! caller declares *is* the schema. A decode with a list that differs from
//! what the peer encoded can only be caught by a length, bounds, UTF-8 or
//! trailing-data failure; otherwise it yields wrong values.

/// The four parameter kinds the transport supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// 32-bit two's-complement integer.
    Sint,
    /// 32-bit unsigned integer.
    Uint,
    /// Length-prefixed text, UTF-8 in memory.
    String,
    /// Length-prefixed opaque bytes.
    Blob,
}

/// A parameter value to encode, or a value decoded from a message.
///
/// String and blob payloads are borrowed: from the caller when encoding, from
/// the message bytes when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param<'a> {
    Sint(i32),
    Uint(u32),
    String(&'a str),
    Blob(&'a [u8]),
}

impl Param<'_> {
    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Sint(_) => ParamKind::Sint,
            Param::Uint(_) => ParamKind::Uint,
            Param::String(_) => ParamKind::String,
            Param::Blob(_) => ParamKind::Blob,
        }
    }
}

impl From<i32> for Param<'_> {
    fn from(value: i32) -> Self {
        Param::Sint(value)
    }
}

impl From<u32> for Param<'_> {
    fn from(value: u32) -> Self {
        Param::Uint(value)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(value: &'a str) -> Self {
        Param::String(value)
    }
}

impl<'a> From<&'a [u8]> for Param<'a> {
    fn from(value: &'a [u8]) -> Self {
        Param::Blob(value)
    }
}

/// Destination slot for [`decode_args`](crate::decode_args).
///
/// `'s` is the borrow of the caller's variable, `'a` the borrow of the
/// message bytes. String and blob slots receive slices into the message, so
/// the message must outlive every value written through them.
#[derive(Debug)]
pub enum ParamOut<'s, 'a> {
    Sint(&'s mut i32),
    Uint(&'s mut u32),
    String(&'s mut &'a str),
    Blob(&'s mut &'a [u8]),
}

impl ParamOut<'_, '_> {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamOut::Sint(_) => ParamKind::Sint,
            ParamOut::Uint(_) => ParamKind::Uint,
            ParamOut::String(_) => ParamKind::String,
            ParamOut::Blob(_) => ParamKind::Blob,
        }
    }
}
