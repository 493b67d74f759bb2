//! Body stream abstraction.
//!
//! A [`Stream`] is a capability-described byte source backing an HTTP
//! message body. Four backing sources share one read/write/seek contract,
//! each with its own capability matrix:
//!
//! | variant  | readable | writable | seekable | size known |
//! |----------|----------|----------|----------|------------|
//! | memory   | yes      | yes      | yes      | yes        |
//! | resource | per mode | per mode | yes      | yes        |
//! | callback | no       | no       | no       | no         |
//! | iterable | yes      | no       | no       | no         |
//!
//! Callers must check capability before attempting an operation; calling an
//! unsupported operation fails with [`StreamError::Unsupported`] rather than
//! being silently ignored.
//!
//! A `Stream` is a cheap-to-clone handle: clones share the same underlying
//! source, which is what lets independent message copies reference one body.
//! The core is single-threaded and pull-based, so the sharing is `Rc`-backed
//! and none of the operations are callable concurrently.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::SeekFrom;
use std::path::Path;
use std::rc::Rc;

use bytes::{Bytes, BytesMut};

mod callback;
mod error;
mod iterable;
mod memory;
mod resource;

pub use callback::BodyProducer;
pub use error::StreamError;
pub use resource::OpenMode;

use callback::CallbackStream;
use iterable::IterableStream;
use memory::MemoryStream;
use resource::ResourceStream;

/// Ownership released by [`Stream::detach`].
///
/// Only sources with a transferable inner producer hand anything back;
/// memory and iterable streams detach to `None`.
pub enum Detached {
    /// The OS-level handle of a resource stream.
    Resource(File),
    /// The not-yet-invoked producer of a callback stream.
    Callback(BodyProducer),
}

impl fmt::Debug for Detached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detached::Resource(file) => f.debug_tuple("Resource").field(file).finish(),
            Detached::Callback(_) => f.debug_tuple("Callback").finish(),
        }
    }
}

#[derive(Debug)]
enum StreamKind {
    Memory(MemoryStream),
    Resource(ResourceStream),
    Callback(CallbackStream),
    Iterable(IterableStream),
}

/// A lazily-read byte source bound to an HTTP message.
#[derive(Debug, Clone)]
pub struct Stream {
    inner: Rc<RefCell<StreamKind>>,
}

impl Stream {
    /// Creates a stream over an in-memory buffer.
    pub fn memory(value: impl Into<BytesMut>) -> Self {
        Self::from_kind(StreamKind::Memory(MemoryStream::new(value)))
    }

    /// Creates a stream over an already-open OS handle.
    pub fn resource(file: File, mode: OpenMode) -> Self {
        Self::from_kind(StreamKind::Resource(ResourceStream::new(file, mode)))
    }

    /// Opens a file and wraps it in a resource stream.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, StreamError> {
        Ok(Self::from_kind(StreamKind::Resource(ResourceStream::open(path.as_ref(), mode)?)))
    }

    /// Creates a single-shot stream over a zero-argument producer.
    pub fn callback(producer: impl FnOnce() -> String + 'static) -> Self {
        Self::from_kind(StreamKind::Callback(CallbackStream::new(producer)))
    }

    /// Creates a stream over a lazy pull sequence of byte chunks.
    pub fn iterable<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: 'static,
    {
        Self::from_kind(StreamKind::Iterable(IterableStream::new(chunks)))
    }

    fn from_kind(kind: StreamKind) -> Self {
        Self { inner: Rc::new(RefCell::new(kind)) }
    }

    /// Closes the stream, releasing the underlying source.
    ///
    /// A memory stream discards its buffer, a resource stream closes its
    /// handle (at most once), a callback stream drops its producer.
    pub fn close(&self) {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => memory.close(),
            StreamKind::Resource(resource) => resource.close(),
            StreamKind::Callback(callback) => callback.close(),
            StreamKind::Iterable(_) => {}
        }
    }

    /// Releases ownership of the underlying source without closing it.
    ///
    /// Idempotent: the first call hands back the handle or producer (where
    /// one exists), every later call returns `None`.
    pub fn detach(&self) -> Option<Detached> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(_) | StreamKind::Iterable(_) => None,
            StreamKind::Resource(resource) => resource.detach().map(Detached::Resource),
            StreamKind::Callback(callback) => callback.detach().map(Detached::Callback),
        }
    }

    /// Total size in bytes, where knowable ahead of exhaustion.
    pub fn size(&self) -> Option<u64> {
        match &*self.inner.borrow() {
            StreamKind::Memory(memory) => Some(memory.size()),
            StreamKind::Resource(resource) => resource.size(),
            StreamKind::Callback(_) | StreamKind::Iterable(_) => None,
        }
    }

    /// Current cursor position.
    pub fn tell(&self) -> Result<u64, StreamError> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => Ok(memory.tell()),
            StreamKind::Resource(resource) => resource.tell(),
            StreamKind::Callback(_) => Err(StreamError::unsupported("tell")),
            StreamKind::Iterable(iterable) => Ok(iterable.tell()),
        }
    }

    /// Whether the stream is exhausted.
    ///
    /// An iterable stream never reports end-of-stream up front; its length
    /// is unknown until the producer runs dry mid-read.
    pub fn eof(&self) -> bool {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => memory.eof(),
            StreamKind::Resource(resource) => resource.eof(),
            StreamKind::Callback(callback) => callback.eof(),
            StreamKind::Iterable(_) => false,
        }
    }

    pub fn is_seekable(&self) -> bool {
        match &*self.inner.borrow() {
            StreamKind::Memory(_) => true,
            StreamKind::Resource(resource) => resource.is_attached(),
            StreamKind::Callback(_) | StreamKind::Iterable(_) => false,
        }
    }

    pub fn is_writable(&self) -> bool {
        match &*self.inner.borrow() {
            StreamKind::Memory(_) => true,
            StreamKind::Resource(resource) => resource.is_writable(),
            StreamKind::Callback(_) | StreamKind::Iterable(_) => false,
        }
    }

    pub fn is_readable(&self) -> bool {
        match &*self.inner.borrow() {
            StreamKind::Memory(_) | StreamKind::Iterable(_) => true,
            StreamKind::Resource(resource) => resource.is_readable(),
            StreamKind::Callback(_) => false,
        }
    }

    /// Moves the cursor, returning the new position.
    pub fn seek(&self, pos: SeekFrom) -> Result<u64, StreamError> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => memory.seek(pos),
            StreamKind::Resource(resource) => resource.seek(pos),
            StreamKind::Callback(_) | StreamKind::Iterable(_) => Err(StreamError::unsupported("seeking")),
        }
    }

    /// Moves the cursor back to the start.
    pub fn rewind(&self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Writes bytes at the cursor, returning the number of bytes written.
    pub fn write(&self, data: &[u8]) -> Result<usize, StreamError> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => Ok(memory.write(data)),
            StreamKind::Resource(resource) => resource.write(data),
            StreamKind::Callback(_) | StreamKind::Iterable(_) => Err(StreamError::unsupported("writing")),
        }
    }

    /// Reads up to `length` bytes from the cursor.
    pub fn read(&self, length: usize) -> Result<Bytes, StreamError> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => Ok(memory.read(length)),
            StreamKind::Resource(resource) => resource.read(length),
            StreamKind::Callback(_) => Err(StreamError::unsupported("reading")),
            StreamKind::Iterable(iterable) => Ok(iterable.read(length)),
        }
    }

    /// Retrieves the remaining content, blocking until the source is
    /// exhausted. For a callback stream this invokes the producer and
    /// exhausts the stream.
    pub fn get_contents(&self) -> Result<Bytes, StreamError> {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => Ok(memory.get_contents()),
            StreamKind::Resource(resource) => resource.get_contents(),
            StreamKind::Callback(callback) => Ok(callback.get_contents()),
            StreamKind::Iterable(iterable) => Ok(iterable.get_contents()),
        }
    }

    /// Full content of the stream as bytes, or empty bytes on failure.
    ///
    /// A memory stream yields its whole buffer regardless of cursor, a
    /// seekable resource stream is rewound first, a callback stream is
    /// consumed. This backs both the `Display` rendition and the send
    /// pipeline's body drain.
    pub fn to_bytes(&self) -> Bytes {
        match &mut *self.inner.borrow_mut() {
            StreamKind::Memory(memory) => memory.value(),
            StreamKind::Resource(resource) => {
                if !resource.is_readable() {
                    return Bytes::new();
                }

                let _ = resource.seek(SeekFrom::Start(0));
                resource.get_contents().unwrap_or_default()
            }
            StreamKind::Callback(callback) => callback.get_contents(),
            StreamKind::Iterable(iterable) => iterable.get_contents(),
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl From<&str> for Stream {
    fn from(value: &str) -> Self {
        Stream::memory(value)
    }
}

impl From<String> for Stream {
    fn from(value: String) -> Self {
        Stream::memory(value.as_str())
    }
}
