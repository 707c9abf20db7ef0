use std::{
    fmt,
    io::Read,
    pin::Pin,
    task::{ready, Context, Poll},
};

use bytes::{Bytes, BytesMut};
use futures_util::{
    io::AsyncRead,
    stream::{BoxStream, Stream},
};
use tracing::trace;

use crate::{chunk, Chunks, Error, Result};

/// Boxed error produced by a byte stream source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Buffer size of a single read from a [`Source::Reader`], 8KB.
pub const READ_BUFFER_SIZE: usize = 8 * 1024;

/// The contents of a file, as exposed by [`FileLike::stream`](crate::FileLike::stream).
pub enum Source {
    /// A lazy async byte sequence.
    Stream(BoxStream<'static, Result<Bytes, BoxError>>),
    /// A pull-based async reader.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// A blocking reader, it cannot be driven by the async encoder.
    Blocking(Box<dyn Read + Send>),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stream(_) => "Source::Stream",
            Self::Reader(_) => "Source::Reader",
            Self::Blocking(_) => "Source::Blocking",
        })
    }
}

enum Inner {
    Stream(BoxStream<'static, Result<Bytes, BoxError>>),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

/// A uniform byte stream over a [`Source`], every yielded buffer is at most
/// [`MAX_CHUNK_SIZE`](crate::MAX_CHUNK_SIZE) bytes.
pub struct SourceStream {
    inner: Inner,
    chunks: Option<Chunks>,
    length: u64,
}

impl SourceStream {
    /// Adapts a source.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSource`] for a [`Source::Blocking`].
    pub fn new(source: Source) -> Result<Self> {
        let inner = match source {
            Source::Stream(s) => Inner::Stream(s),
            Source::Reader(r) => Inner::Reader(r),
            Source::Blocking(_) => return Err(Error::UnsupportedSource),
        };

        Ok(Self {
            inner,
            chunks: None,
            length: 0,
        })
    }

    /// Gets the number of bytes yielded so far.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns `true` if nothing has been yielded yet.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for SourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceStream")
            .field(
                "inner",
                &match self.inner {
                    Inner::Stream(_) => "stream",
                    Inner::Reader(_) => "reader",
                },
            )
            .field("length", &self.length)
            .finish()
    }
}

impl Stream for SourceStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(buf) = this.chunks.as_mut().and_then(Iterator::next) {
                this.length += buf.len() as u64;
                return Poll::Ready(Some(Ok(buf)));
            }
            this.chunks = None;

            trace!("polling data from source");

            let buf = match &mut this.inner {
                Inner::Stream(s) => match ready!(s.as_mut().poll_next(cx)) {
                    Some(Ok(b)) => b,
                    Some(Err(e)) => return Poll::Ready(Some(Err(Error::BoxError(e)))),
                    None => return Poll::Ready(None),
                },
                Inner::Reader(io) => {
                    let mut buf = BytesMut::new();
                    // zero-fills the space in the read buffer
                    buf.resize(READ_BUFFER_SIZE, 0);

                    match ready!(Pin::new(io).poll_read(cx, &mut buf[..]))? {
                        0 => return Poll::Ready(None),
                        n => {
                            buf.truncate(n);
                            buf.freeze()
                        }
                    }
                }
            };

            trace!("polled bytes {}/{}", buf.len(), this.length);

            this.chunks.replace(chunk(buf));
        }
    }
}
