//! Chunked streaming responses.
//!
//! A [`StreamingResponse`] pairs a response head with a lazy sequence of
//! body chunks. The head always advertises `Transfer-Encoding: chunked`
//! and never a `Content-Length`; the chunk sequence is pulled one element
//! at a time while sending, each framed and flushed before the next is
//! requested from the producer.

use std::fmt;
use std::io::Write;

use bytes::{Bytes, BytesMut};
use http::StatusCode;
use tracing::trace;

use crate::codec::{ChunkedEncoder, PayloadItem};
use crate::header::HeaderBag;
use crate::protocol::SendError;
use crate::protocol::message::HttpMessage;
use crate::protocol::response::Response;

/// A response whose body is produced lazily and sent with chunked framing.
pub struct StreamingResponse {
    head: Response,
    chunks: Option<Box<dyn Iterator<Item = Bytes>>>,
}

impl StreamingResponse {
    /// Creates a streaming response over the given chunk sequence.
    ///
    /// The supplied headers seed the head, but the framing-related ones
    /// are not negotiable: `Transfer-Encoding: chunked` is forced and any
    /// `Content-Length` is dropped.
    pub fn new<I>(chunks: I, status: StatusCode, headers: HeaderBag) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: 'static,
    {
        let mut head = Response::new(status);
        *head.headers_mut() = headers;
        head.headers_mut().set("Transfer-Encoding", "chunked");
        head.headers_mut().remove("content-length");

        Self { head, chunks: Some(Box::new(chunks.into_iter())) }
    }

    pub fn status(&self) -> StatusCode {
        self.head.status()
    }

    pub fn headers(&self) -> &HeaderBag {
        self.head.headers()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderBag {
        self.head.headers_mut()
    }

    pub fn protocol_version(&self) -> &str {
        self.head.protocol_version()
    }

    /// Sends the head and then drains the chunk sequence to the transport.
    ///
    /// Each chunk is framed and flushed before the next one is pulled, so
    /// a slow producer trickles data instead of buffering the whole body.
    /// The chunk sequence is consumed by the first call; later calls send
    /// nothing.
    pub fn send_to<W: Write>(&mut self, transport: &mut W) -> Result<(), SendError> {
        self.head.send_head(transport)?;

        if let Some(chunks) = self.chunks.take() {
            let mut encoder = ChunkedEncoder::new();
            let mut frame = BytesMut::new();

            for chunk in chunks {
                if chunk.is_empty() {
                    continue;
                }

                trace!(len = chunk.len(), "sending body chunk");

                encoder.encode(PayloadItem::Chunk(chunk), &mut frame)?;
                transport.write_all(&frame)?;
                transport.flush()?;
                frame.clear();
            }

            encoder.encode(PayloadItem::Eof, &mut frame)?;
            transport.write_all(&frame)?;
            transport.flush()?;
        }

        Ok(())
    }
}

impl fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("head", &self.head)
            .field("exhausted", &self.chunks.is_none())
            .finish()
    }
}
