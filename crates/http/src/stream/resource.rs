use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use bytes::Bytes;
use tracing::error;

use super::StreamError;

/// Mode an OS-level handle was opened with, mirroring the classic `fopen`
/// mode letters. Readability and writability are derived from it on every
/// query rather than cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `r`: read only, cursor at the start.
    Read,
    /// `r+`: read and write, cursor at the start.
    ReadWrite,
    /// `w`: write only, truncating or creating the file.
    Write,
    /// `w+`: read and write, truncating or creating the file.
    WriteRead,
    /// `a`: write only, appending to the end.
    Append,
    /// `a+`: read and append.
    AppendRead,
}

impl OpenMode {
    pub fn is_readable(self) -> bool {
        matches!(self, OpenMode::Read | OpenMode::ReadWrite | OpenMode::WriteRead | OpenMode::AppendRead)
    }

    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }

    fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();

        match self {
            OpenMode::Read => options.read(true),
            OpenMode::ReadWrite => options.read(true).write(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::WriteRead => options.read(true).write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
            OpenMode::AppendRead => options.read(true).append(true).create(true),
        };

        options
    }
}

/// Stream source that exclusively owns one OS-level handle.
///
/// Every operation delegates to the handle. Closing or detaching releases
/// the handle exactly once; afterwards the handle reference is absent and
/// operations fail with [`StreamError::Detached`].
#[derive(Debug)]
pub(super) struct ResourceStream {
    file: Option<File>,
    mode: OpenMode,
}

impl ResourceStream {
    pub(super) fn new(file: File, mode: OpenMode) -> Self {
        Self { file: Some(file), mode }
    }

    pub(super) fn open(path: &Path, mode: OpenMode) -> Result<Self, StreamError> {
        let file = mode.open_options().open(path)?;
        Ok(Self::new(file, mode))
    }

    pub(super) fn close(&mut self) {
        // dropping the handle closes it; repeated calls are a no-op
        self.file = None;
    }

    pub(super) fn detach(&mut self) -> Option<File> {
        self.file.take()
    }

    pub(super) fn is_attached(&self) -> bool {
        self.file.is_some()
    }

    pub(super) fn size(&self) -> Option<u64> {
        self.file.as_ref().and_then(|file| file.metadata().ok()).map(|metadata| metadata.len())
    }

    pub(super) fn tell(&mut self) -> Result<u64, StreamError> {
        Ok(self.file_mut()?.stream_position()?)
    }

    pub(super) fn eof(&mut self) -> bool {
        let Some(file) = self.file.as_mut() else {
            return true;
        };

        match (file.stream_position(), file.metadata()) {
            (Ok(position), Ok(metadata)) => position >= metadata.len(),
            _ => false,
        }
    }

    pub(super) fn is_readable(&self) -> bool {
        self.is_attached() && self.mode.is_readable()
    }

    pub(super) fn is_writable(&self) -> bool {
        self.is_attached() && self.mode.is_writable()
    }

    pub(super) fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        Ok(self.file_mut()?.seek(pos)?)
    }

    pub(super) fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        self.file_mut()?.write(data).map_err(|e| {
            error!(cause = %e, "failed to write to resource stream");
            StreamError::io(e)
        })
    }

    pub(super) fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let file = self.file_mut()?;

        let mut buffer = vec![0u8; length];
        let read = file.read(&mut buffer).map_err(|e| {
            error!(cause = %e, "failed to read from resource stream");
            StreamError::io(e)
        })?;

        buffer.truncate(read);
        Ok(Bytes::from(buffer))
    }

    /// Reads the rest of the handle, blocking until exhausted.
    pub(super) fn get_contents(&mut self) -> Result<Bytes, StreamError> {
        if !self.mode.is_readable() {
            return Err(StreamError::unsupported("read"));
        }

        let file = self.file_mut()?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| {
            error!(cause = %e, "failed to read from resource stream");
            StreamError::io(e)
        })?;

        Ok(Bytes::from(buffer))
    }

    fn file_mut(&mut self) -> Result<&mut File, StreamError> {
        self.file.as_mut().ok_or(StreamError::Detached)
    }
}
