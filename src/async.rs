use std::{
    fmt,
    pin::Pin,
    task::{ready, Context, Poll},
};

use bytes::{Bytes, BytesMut};
use futures_util::{
    io::{AsyncWrite, AsyncWriteExt},
    stream::{Stream, TryStreamExt},
};
use http_body::{Body, Frame, SizeHint};
use tracing::trace;

use crate::{chunk, Chunks, Error, FormDataEncoder, Part, Result, SourceStream, Values};

enum Current {
    Chunks(Chunks),
    Source(SourceStream),
}

/// Stream returned by [`FormDataEncoder::encode`].
///
/// Reads files and splits big values into chunks of at most
/// [`MAX_CHUNK_SIZE`](crate::MAX_CHUNK_SIZE) bytes.
pub struct Encode {
    values: Values,
    current: Option<Current>,
    length: u64,
    content_length: Option<u64>,
    eof: bool,
}

impl FormDataEncoder {
    /// Encodes the form-data by portions.
    pub fn encode(&self) -> Encode {
        Encode {
            values: self.values(),
            current: None,
            length: 0,
            content_length: self.content_length(),
            eof: false,
        }
    }

    /// Reads the whole encoded form-data to bytes.
    pub async fn bytes(&self) -> Result<Bytes> {
        let mut stream = self.encode();
        let mut bytes = BytesMut::with_capacity(
            self.content_length()
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or_default(),
        );
        while let Some(buf) = stream.try_next().await? {
            bytes.extend_from_slice(&buf);
        }
        Ok(bytes.freeze())
    }

    /// Copys the encoded form-data to an `AsyncWrite`.
    pub async fn copy_to<W>(&self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stream = self.encode();
        let mut n = 0;
        while let Some(buf) = stream.try_next().await? {
            writer.write_all(&buf).await?;
            n += buf.len() as u64;
        }
        writer.flush().await?;
        Ok(n)
    }
}

impl From<FormDataEncoder> for Encode {
    fn from(encoder: FormDataEncoder) -> Self {
        encoder.encode()
    }
}

impl Encode {
    /// Gets the number of bytes yielded so far.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns `true` if nothing has been yielded yet.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for Encode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encode")
            .field("eof", &self.eof)
            .field("length", &self.length)
            .field("content_length", &self.content_length)
            .finish()
    }
}

/// Reads through the parts, then yields their bytes
impl Stream for Encode {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.eof {
                return Poll::Ready(None);
            }

            let polled = match this.current.as_mut() {
                None => None,
                Some(Current::Chunks(chunks)) => chunks.next().map(Ok),
                Some(Current::Source(source)) => match ready!(Pin::new(source).poll_next(cx)) {
                    Some(Err(e)) => {
                        this.eof = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    res => res,
                },
            };

            if let Some(Ok(buf)) = polled {
                // empty values are not yielded, decoders take them for no progress
                if buf.is_empty() {
                    continue;
                }
                this.length += buf.len() as u64;
                trace!("polled bytes {}/{}", buf.len(), this.length);
                return Poll::Ready(Some(Ok(buf)));
            }

            match this.values.next() {
                None => {
                    trace!("encoded {} bytes", this.length);
                    this.current = None;
                    this.eof = true;
                }
                Some(Part::Bytes(b)) => {
                    this.current.replace(Current::Chunks(chunk(b)));
                }
                Some(Part::File(file)) => {
                    trace!("reading file {}", file.name());
                    match SourceStream::new(file.stream()) {
                        Ok(source) => {
                            this.current.replace(Current::Source(source));
                        }
                        Err(e) => {
                            this.eof = true;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
            }
        }
    }
}

/// Sends the form-data as a request body
impl Body for Encode {
    type Data = Bytes;
    type Error = Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        self.poll_next(cx).map_ok(Frame::data)
    }

    fn is_end_stream(&self) -> bool {
        self.eof
    }

    fn size_hint(&self) -> SizeHint {
        self.content_length.map_or_else(SizeHint::default, |n| {
            SizeHint::with_exact(n.saturating_sub(self.length))
        })
    }
}
