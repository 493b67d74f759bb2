use std::fmt;

use bytes::{Bytes, BytesMut};

/// Pull-based sequence of byte chunks backing an iterable stream.
pub type ChunkIterator = Box<dyn Iterator<Item = Bytes>>;

/// Stream source wrapping a lazy pull sequence of byte chunks.
///
/// The producer yields chunks of arbitrary size, while `read` promises at
/// most `length` bytes. The gap is bridged with a leftover buffer: a chunk
/// that would overshoot the requested length is split, and the unread
/// remainder is served first on the next call. The cursor counts bytes
/// yielded so far; the total length is unknown ahead of exhaustion.
pub(super) struct IterableStream {
    chunks: ChunkIterator,
    position: u64,
    leftover: BytesMut,
}

impl IterableStream {
    pub(super) fn new<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: 'static,
    {
        Self { chunks: Box::new(chunks.into_iter()), position: 0, leftover: BytesMut::new() }
    }

    pub(super) fn tell(&self) -> u64 {
        self.position
    }

    pub(super) fn read(&mut self, length: usize) -> Bytes {
        let mut out = BytesMut::with_capacity(length.min(self.leftover.len()));

        // drain the leftover of a previously split chunk first
        if !self.leftover.is_empty() {
            let take = length.min(self.leftover.len());
            out.unsplit(self.leftover.split_to(take));

            if out.len() == length {
                self.position += out.len() as u64;
                return out.freeze();
            }
        }

        let mut remaining = length - out.len();

        for chunk in self.chunks.by_ref() {
            if chunk.len() >= remaining {
                out.extend_from_slice(&chunk[..remaining]);
                self.leftover.extend_from_slice(&chunk[remaining..]);

                self.position += out.len() as u64;
                return out.freeze();
            }

            remaining -= chunk.len();
            out.extend_from_slice(&chunk);
        }

        self.position += out.len() as u64;
        out.freeze()
    }

    /// Drains the leftover buffer and the rest of the sequence.
    pub(super) fn get_contents(&mut self) -> Bytes {
        let mut out = self.leftover.split();

        for chunk in self.chunks.by_ref() {
            out.extend_from_slice(&chunk);
        }

        self.position += out.len() as u64;
        out.freeze()
    }
}

impl fmt::Debug for IterableStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterableStream")
            .field("position", &self.position)
            .field("leftover", &self.leftover.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> IterableStream {
        IterableStream::new(parts.iter().map(|part| Bytes::from(*part)).collect::<Vec<_>>())
    }

    #[test]
    fn reads_across_chunk_boundaries_without_loss() {
        let mut stream = chunks(&["ab", "cde"]);

        assert_eq!(stream.read(2), Bytes::from("ab"));
        assert_eq!(stream.read(10), Bytes::from("cde"));
        assert_eq!(stream.read(1), Bytes::new());
    }

    #[test]
    fn overshooting_chunk_is_split_and_buffered() {
        let mut stream = chunks(&["ab", "cde"]);

        assert_eq!(stream.read(3), Bytes::from("abc"));
        assert_eq!(stream.tell(), 3);

        assert_eq!(stream.read(5), Bytes::from("de"));
        assert_eq!(stream.tell(), 5);
    }

    #[test]
    fn leftover_alone_can_satisfy_a_read() {
        let mut stream = chunks(&["abcdef"]);

        assert_eq!(stream.read(1), Bytes::from("a"));
        assert_eq!(stream.read(2), Bytes::from("bc"));
        assert_eq!(stream.read(3), Bytes::from("def"));
        assert_eq!(stream.read(4), Bytes::new());
        assert_eq!(stream.tell(), 6);
    }

    #[test]
    fn get_contents_drains_leftover_and_rest() {
        let mut stream = chunks(&["ab", "cd", "ef"]);

        assert_eq!(stream.read(3), Bytes::from("abc"));
        assert_eq!(stream.get_contents(), Bytes::from("def"));
        assert_eq!(stream.get_contents(), Bytes::new());
        assert_eq!(stream.tell(), 6);
    }

    #[test]
    fn exact_boundary_read_leaves_empty_leftover() {
        let mut stream = chunks(&["ab", "cd"]);

        assert_eq!(stream.read(2), Bytes::from("ab"));
        assert_eq!(stream.read(2), Bytes::from("cd"));
        assert_eq!(stream.read(2), Bytes::new());
    }
}
