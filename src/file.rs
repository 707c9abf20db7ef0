use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use futures_util::stream;

use crate::{BoxError, Source};

/// A named binary blob which can be put into a form.
pub trait FileLike: Send + Sync {
    /// The name of the file.
    fn name(&self) -> &str;

    /// The media type of the file, may be empty.
    fn content_type(&self) -> &str;

    /// The size of the file in bytes, `None` when it's unknown.
    fn size(&self) -> Option<u64>;

    /// The last modified date as milliseconds since the Unix epoch.
    fn last_modified(&self) -> u64;

    /// Returns a fresh source of the file contents.
    fn stream(&self) -> Source;
}

impl fmt::Debug for dyn FileLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLike")
            .field("name", &self.name())
            .field("content_type", &self.content_type())
            .field("size", &self.size())
            .field("last_modified", &self.last_modified())
            .finish()
    }
}

/// An in-memory file.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    content_type: String,
    bits: Bytes,
    last_modified: u64,
}

impl File {
    /// Creates a file from its contents and a name.
    pub fn new<B, N>(bits: B, name: N) -> Self
    where
        B: Into<Bytes>,
        N: Into<String>,
    {
        let last_modified = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        Self {
            name: name.into(),
            content_type: String::new(),
            bits: bits.into(),
            last_modified,
        }
    }

    /// Sets the media type, lowercased.
    ///
    /// A type with characters outside of printable ASCII is dropped,
    /// the file then has an empty type.
    #[must_use]
    pub fn with_type<T: AsRef<str>>(mut self, content_type: T) -> Self {
        let content_type = content_type.as_ref();
        self.content_type = if content_type.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            content_type.to_ascii_lowercase()
        } else {
            String::new()
        };
        self
    }

    /// Sets the last modified date, in milliseconds since the Unix epoch.
    #[must_use]
    pub fn with_last_modified(mut self, last_modified: u64) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Gets the contents.
    pub fn bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

impl FileLike for File {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> Option<u64> {
        Some(self.bits.len() as u64)
    }

    fn last_modified(&self) -> u64 {
        self.last_modified
    }

    fn stream(&self) -> Source {
        Source::Stream(Box::pin(stream::iter([Ok::<_, BoxError>(self.bits.clone())])))
    }
}
