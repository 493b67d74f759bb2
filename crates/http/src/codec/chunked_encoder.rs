//! `Transfer-Encoding: chunked` framing.
//!
//! Each payload chunk becomes `{len:x}\r\n{bytes}\r\n`; the end-of-stream
//! marker becomes the `0\r\n\r\n` terminator. Empty chunks are dropped
//! rather than encoded, since a zero-length frame would read as the
//! terminator on the wire.

use std::io::Write;

use bytes::BytesMut;

use crate::codec::PayloadItem;
use crate::protocol::SendError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false }
    }

    /// Whether the terminator has been encoded. Frames offered after that
    /// are ignored.
    pub fn is_finished(&self) -> bool {
        self.eof
    }

    pub fn encode(&mut self, item: PayloadItem, dst: &mut BytesMut) -> Result<(), SendError> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(bytes) => {
                if bytes.is_empty() {
                    return Ok(());
                }

                write!(helper::Writer(dst), "{:x}\r\n", bytes.len())?;
                dst.reserve(bytes.len() + 2);
                dst.extend_from_slice(&bytes);
                dst.extend_from_slice(b"\r\n");
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.extend_from_slice(b"0\r\n\r\n");
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
