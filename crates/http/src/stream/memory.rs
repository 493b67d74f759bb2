use std::io::{self, ErrorKind, SeekFrom};

use bytes::{Bytes, BytesMut};

use super::StreamError;

/// Stream source backed by an in-memory buffer.
///
/// Fully capable: readable, writable and seekable. Writes overlay bytes at
/// the cursor position rather than inserting.
#[derive(Debug, Default)]
pub(super) struct MemoryStream {
    buffer: BytesMut,
    position: usize,
}

impl MemoryStream {
    pub(super) fn new(value: impl Into<BytesMut>) -> Self {
        Self { buffer: value.into(), position: 0 }
    }

    pub(super) fn close(&mut self) {
        self.buffer.clear();
    }

    pub(super) fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub(super) fn tell(&self) -> u64 {
        self.position as u64
    }

    pub(super) fn eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    pub(super) fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => self.position as i128 + i128::from(offset),
            SeekFrom::End(offset) => self.buffer.len() as i128 + i128::from(offset),
        };

        let target = usize::try_from(target)
            .map_err(|_| StreamError::io(io::Error::from(ErrorKind::InvalidInput)))?;

        self.position = target;
        Ok(self.position as u64)
    }

    /// Overlays `data` at the cursor: bytes up to the current length are
    /// replaced in place, anything beyond it is appended. A cursor past the
    /// end appends without gap-filling, while still advancing by the number
    /// of bytes written.
    pub(super) fn write(&mut self, data: &[u8]) -> usize {
        let len = self.buffer.len();

        if self.position >= len {
            self.buffer.extend_from_slice(data);
        } else {
            let overlap = (len - self.position).min(data.len());
            self.buffer[self.position..self.position + overlap].copy_from_slice(&data[..overlap]);
            self.buffer.extend_from_slice(&data[overlap..]);
        }

        self.position += data.len();
        data.len()
    }

    pub(super) fn read(&mut self, length: usize) -> Bytes {
        let start = self.position.min(self.buffer.len());
        let end = (start + length).min(self.buffer.len());

        let read = Bytes::copy_from_slice(&self.buffer[start..end]);
        self.position += read.len();

        read
    }

    /// Returns the remaining bytes after the cursor without consuming them.
    pub(super) fn get_contents(&self) -> Bytes {
        let start = self.position.min(self.buffer.len());
        Bytes::copy_from_slice(&self.buffer[start..])
    }

    /// The whole buffer, regardless of cursor position.
    pub(super) fn value(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }
}
