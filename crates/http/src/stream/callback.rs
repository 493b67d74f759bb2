use std::fmt;

use bytes::Bytes;

/// Zero-argument producer backing a callback stream.
pub type BodyProducer = Box<dyn FnOnce() -> String>;

/// Stream source wrapping a single-shot producer.
///
/// The producer can be invoked exactly once; doing so (or closing or
/// detaching) transitions the stream from ready to exhausted, and the
/// transition is not reversible. The variant supports no incremental
/// reading, writing or seeking; the whole content is retrieved in one go.
#[derive(Default)]
pub(super) struct CallbackStream {
    producer: Option<BodyProducer>,
}

impl CallbackStream {
    pub(super) fn new(producer: impl FnOnce() -> String + 'static) -> Self {
        Self { producer: Some(Box::new(producer)) }
    }

    pub(super) fn close(&mut self) {
        self.producer = None;
    }

    pub(super) fn detach(&mut self) -> Option<BodyProducer> {
        self.producer.take()
    }

    pub(super) fn eof(&self) -> bool {
        self.producer.is_none()
    }

    /// Invokes the producer and exhausts the stream. Returns empty bytes on
    /// every call after the first.
    pub(super) fn get_contents(&mut self) -> Bytes {
        match self.detach() {
            Some(producer) => Bytes::from(producer()),
            None => Bytes::new(),
        }
    }
}

impl fmt::Debug for CallbackStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackStream").field("exhausted", &self.eof()).finish()
    }
}
