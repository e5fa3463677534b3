//! Backing memory for message buffers.
//!
//! Buffers exchanged with the co-processor are carved out of anonymous `mmap`
//! regions on native targets, which the OS hands back zero-filled. Empty
//! requests, and targets without `mmap`, fall back to a boxed slice.

use crate::{TransportError, TransportResult};

#[cfg(not(target_arch = "wasm32"))]
type NativeMap = memmap2::MmapMut;

#[derive(Debug)]
enum Backing {
    #[cfg(not(target_arch = "wasm32"))]
    Native(NativeMap),
    Heap(Box<[u8]>),
}

/// Zero-initialised, contiguous memory backing a single message.
#[derive(Debug)]
pub struct SharedRegion {
    backing: Backing,
}

impl SharedRegion {
    /// Allocates a zero-filled region of `len` bytes.
    pub fn zeroed(len: usize) -> TransportResult<Self> {
        if len == 0 {
            return Ok(Self {
                backing: Backing::Heap(Box::default()),
            });
        }
        Ok(Self {
            backing: Self::allocate(len)?,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn allocate(len: usize) -> TransportResult<Backing> {
        memmap2::MmapOptions::new()
            .len(len)
            .map_anon()
            .map(Backing::Native)
            .map_err(|_| TransportError::AllocationFailed { size: len })
    }

    #[cfg(target_arch = "wasm32")]
    fn allocate(len: usize) -> TransportResult<Backing> {
        let mut heap = Vec::new();
        heap.try_reserve_exact(len)
            .map_err(|_| TransportError::AllocationFailed { size: len })?;
        heap.resize(len, 0);
        Ok(Backing::Heap(heap.into_boxed_slice()))
    }

    /// Total number of bytes managed by this region.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true when the region has zero length.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the full region as an immutable slice.
    pub fn as_slice(&self) -> &[u8] {
        match &self.backing {
            #[cfg(not(target_arch = "wasm32"))]
            Backing::Native(map) => &map[..],
            Backing::Heap(heap) => &heap[..],
        }
    }

    /// View the full region as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.backing {
            #[cfg(not(target_arch = "wasm32"))]
            Backing::Native(map) => &mut map[..],
            Backing::Heap(heap) => &mut heap[..],
        }
    }
}
