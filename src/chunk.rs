use bytes::Bytes;

/// Max size of a single chunk yielded by the encoder, 64KB.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

/// Splits `value` into pieces of at most [`MAX_CHUNK_SIZE`] bytes.
///
/// A value that already fits is yielded as-is, an empty value is yielded once.
/// Splitting is zero-copy, every chunk shares the buffer of `value`.
///
/// ```
/// use bytes::Bytes;
/// use form_data_encoder::{chunk, MAX_CHUNK_SIZE};
///
/// let chunks = chunk(Bytes::from(vec![0; MAX_CHUNK_SIZE + 1])).collect::<Vec<_>>();
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1].len(), 1);
/// ```
pub fn chunk(value: Bytes) -> Chunks {
    Chunks { rest: Some(value) }
}

/// Iterator returned by [`chunk`].
#[derive(Debug, Clone)]
pub struct Chunks {
    rest: Option<Bytes>,
}

impl Iterator for Chunks {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        let mut rest = self.rest.take()?;

        if rest.len() <= MAX_CHUNK_SIZE {
            return Some(rest);
        }

        let head = rest.split_to(MAX_CHUNK_SIZE);
        self.rest.replace(rest);
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .rest
            .as_ref()
            .map_or(0, |b| b.len().div_ceil(MAX_CHUNK_SIZE).max(1));
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks {}
