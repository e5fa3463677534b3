//! XDR cursor primitives.
//!
//! Every item on the wire occupies a whole number of 4-byte units. Integers
//! are big-endian; variable-length data is a `u32` byte count, the bytes,
//! then zero padding up to the next unit boundary.
//!
//! ```text
//! +-----------+----------------------+-------------+
//! | len (u32) | payload (len bytes)  | pad (0..=3) |
//! +-----------+----------------------+-------------+
//! ```

use crate::error::{RpcError, RpcResult};

/// Size of one XDR unit in bytes.
pub const XDR_UNIT: usize = 4;

/// Number of zero bytes that follow `len` payload bytes.
#[inline]
pub const fn pad_len(len: usize) -> usize {
    (XDR_UNIT - len % XDR_UNIT) % XDR_UNIT
}

/// Encoded size of a length-prefixed item carrying `len` payload bytes.
///
/// Returns `None` when the size does not fit in `usize`.
#[inline]
pub fn opaque_size(len: usize) -> Option<usize> {
    len.checked_add(pad_len(len))?.checked_add(XDR_UNIT)
}

/// Append-only writer over a caller-supplied buffer.
pub struct XdrWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> XdrWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn reserve(&mut self, len: usize) -> RpcResult<&mut [u8]> {
        let capacity = self.buf.len();
        let end = match self.pos.checked_add(len) {
            Some(end) if end <= capacity => end,
            _ => {
                return Err(RpcError::BufferTooSmall {
                    required: self.pos.saturating_add(len),
                    capacity,
                })
            }
        };
        let slot = &mut self.buf[self.pos..end];
        self.pos = end;
        Ok(slot)
    }

    pub fn put_u32(&mut self, value: u32) -> RpcResult<()> {
        self.reserve(XDR_UNIT)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn put_i32(&mut self, value: i32) -> RpcResult<()> {
        self.reserve(XDR_UNIT)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Writes a length-prefixed, zero-padded byte run.
    ///
    /// The whole item is reserved up front, so a short buffer leaves the
    /// cursor where it was.
    pub fn put_opaque(&mut self, data: &[u8]) -> RpcResult<()> {
        let len = u32::try_from(data.len()).map_err(|_| RpcError::SizeOverflow {
            limit: u32::MAX as usize,
        })?;
        let total = opaque_size(data.len()).ok_or(RpcError::SizeOverflow { limit: usize::MAX })?;
        let slot = self.reserve(total)?;
        let (prefix, rest) = slot.split_at_mut(XDR_UNIT);
        let (payload, pad) = rest.split_at_mut(data.len());
        prefix.copy_from_slice(&len.to_be_bytes());
        payload.copy_from_slice(data);
        pad.fill(0);
        Ok(())
    }
}

/// Bounds-checked reader over a received message.
///
/// Slices handed out borrow the message itself, never a copy.
#[derive(Clone, Debug)]
pub struct XdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the message.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes `len` bytes, failing before any access when they are not all there.
    pub fn take(&mut self, len: usize) -> RpcResult<&'a [u8]> {
        let end = match self.pos.checked_add(len) {
            Some(end) if end <= self.buf.len() => end,
            _ => {
                return Err(RpcError::Truncated {
                    offset: self.pos,
                    needed: len,
                    len: self.buf.len(),
                })
            }
        };
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn word(&mut self) -> RpcResult<[u8; XDR_UNIT]> {
        let bytes = self.take(XDR_UNIT)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn get_u32(&mut self) -> RpcResult<u32> {
        self.word().map(u32::from_be_bytes)
    }

    pub fn get_i32(&mut self) -> RpcResult<i32> {
        self.word().map(i32::from_be_bytes)
    }

    /// Reads a length-prefixed byte run and skips its padding.
    ///
    /// Padding bytes are not required to be zero.
    pub fn get_opaque(&mut self) -> RpcResult<&'a [u8]> {
        let len = self.get_u32()? as usize;
        self.get_opaque_body(len)
    }

    /// Reads `len` payload bytes plus padding, after the length word has
    /// already been consumed.
    pub fn get_opaque_body(&mut self, len: usize) -> RpcResult<&'a [u8]> {
        let padded = len.checked_add(pad_len(len)).ok_or(RpcError::Truncated {
            offset: self.pos,
            needed: len,
            len: self.buf.len(),
        })?;
        let bytes = self.take(padded)?;
        Ok(&bytes[..len])
    }
}
