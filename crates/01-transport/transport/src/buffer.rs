//! Fixed-capacity message buffers.
//!
//! A producer obtains a buffer sized for the message it is about to write,
//! fills a prefix of it, then publishes that prefix with
//! [`MessageBuf::set_len`]. Consumers only ever observe the published bytes.

use crate::region::SharedRegion;
use crate::{TransportError, TransportResult};

/// Message storage handed across the shared-memory channel.
#[derive(Debug)]
pub struct MessageBuf {
    region: SharedRegion,
    len: usize,
}

impl MessageBuf {
    /// Allocates an empty buffer able to hold `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> TransportResult<Self> {
        Ok(Self {
            region: SharedRegion::zeroed(capacity)?,
            len: 0,
        })
    }

    /// Copies a message received from the peer into a fresh buffer.
    pub fn from_received(bytes: &[u8]) -> TransportResult<Self> {
        let mut buf = Self::with_capacity(bytes.len())?;
        buf.region.as_mut_slice().copy_from_slice(bytes);
        buf.len = bytes.len();
        Ok(buf)
    }

    /// Total number of bytes the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Number of published bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The published prefix of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.region.as_slice()[..self.len]
    }

    /// The whole writable capacity, regardless of the published length.
    pub fn writable(&mut self) -> &mut [u8] {
        self.region.as_mut_slice()
    }

    /// Publishes the first `len` bytes.
    pub fn set_len(&mut self, len: usize) -> TransportResult<()> {
        let capacity = self.capacity();
        if len > capacity {
            return Err(TransportError::LengthOutOfRange { len, capacity });
        }
        self.len = len;
        Ok(())
    }

    /// Drops the published prefix so the buffer can be refilled.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl AsRef<[u8]> for MessageBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn publish_exposes_only_filled_prefix() {
        let mut buf = MessageBuf::with_capacity(64).expect("allocate buffer");
        assert!(buf.is_empty());
        buf.writable()[..4].copy_from_slice(&[1, 2, 3, 4]);
        buf.set_len(4).expect("publish");
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn set_len_rejects_overrun() {
        let mut buf = MessageBuf::with_capacity(8).expect("allocate buffer");
        assert_eq!(
            buf.set_len(9),
            Err(TransportError::LengthOutOfRange {
                len: 9,
                capacity: 8
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn received_bytes_are_copied_verbatim() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let payload: Vec<u8> = (0..257).map(|_| rng.gen()).collect();
        let buf = MessageBuf::from_received(&payload).expect("copy received");
        assert_eq!(buf.as_bytes(), payload.as_slice());
        assert_eq!(buf.as_ref().len(), payload.len());
    }

    #[test]
    fn clear_resets_published_length() {
        let mut buf = MessageBuf::from_received(&[9; 12]).expect("copy received");
        buf.clear();
        assert!(buf.as_bytes().is_empty());
        assert_eq!(buf.capacity(), 12);
    }

    #[test]
    fn empty_message_round_trips() {
        let buf = MessageBuf::from_received(&[]).expect("copy empty");
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
    }
}
