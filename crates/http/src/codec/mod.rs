//! Wire encoding for response bodies.

use bytes::Bytes;

mod chunked_encoder;

pub use chunked_encoder::ChunkedEncoder;

/// A frame handed to a body encoder: a chunk of payload bytes, or the
/// end-of-stream marker that closes the framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    Chunk(Bytes),
    Eof,
}

impl PayloadItem {
    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }
}
