//! Message buffer primitives shared with the shared-memory channel.
//!
//! The channel layer (rings, doorbells, peer mappings) lives elsewhere; this
//! crate only provides the pieces the RPC codec touches:
//! * [`SharedRegion`] – zero-initialised backing memory for one message.
//! * [`MessageBuf`] – fixed-capacity buffer plus the length of its filled prefix.
//! * [`TransportError`] – lightweight error surface for allocation/length failures.

mod buffer;
mod error;
mod region;

pub use buffer::MessageBuf;
pub use error::{TransportError, TransportResult};
pub use region::SharedRegion;
