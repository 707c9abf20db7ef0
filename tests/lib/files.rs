use std::{io::Cursor as StdCursor, path::PathBuf};

use bytes::Bytes;
use futures_util::{io::Cursor, stream, StreamExt};

use form_data_encoder::{BoxError, FileLike, Source};

use super::Limited;

/// Streams its contents by random sized chunks, with unknown size.
pub struct StreamFile {
    pub name: String,
    pub content_type: String,
    pub bits: Bytes,
}

impl StreamFile {
    pub fn new(bits: impl Into<Bytes>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            content_type: String::new(),
            bits: bits.into(),
        }
    }
}

impl FileLike for StreamFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> Option<u64> {
        None
    }

    fn last_modified(&self) -> u64 {
        0
    }

    fn stream(&self) -> Source {
        let limited = Limited::random(Cursor::new(self.bits.clone()));
        Source::Stream(limited.map(|r| r.map_err(BoxError::from)).boxed())
    }
}

/// Exposes its contents through an async reader only.
pub struct ReaderFile {
    pub name: String,
    pub bits: Bytes,
    pub size: Option<u64>,
}

impl ReaderFile {
    pub fn new(bits: impl Into<Bytes>, name: &str) -> Self {
        let bits = bits.into();
        Self {
            name: name.to_string(),
            size: Some(bits.len() as u64),
            bits,
        }
    }
}

impl FileLike for ReaderFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        "text/plain"
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn last_modified(&self) -> u64 {
        0
    }

    fn stream(&self) -> Source {
        Source::Reader(Box::new(Cursor::new(self.bits.clone())))
    }
}

/// Exposes its contents through a blocking reader.
pub struct BlockingFile(pub Bytes);

impl FileLike for BlockingFile {
    fn name(&self) -> &str {
        "blocking.bin"
    }

    fn content_type(&self) -> &str {
        ""
    }

    fn size(&self) -> Option<u64> {
        Some(self.0.len() as u64)
    }

    fn last_modified(&self) -> u64 {
        0
    }

    fn stream(&self) -> Source {
        Source::Blocking(Box::new(StdCursor::new(self.0.clone())))
    }
}

/// A file on disk, read with `async-fs`.
pub struct PathFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl PathFile {
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path,
            name,
            size: Some(size),
        })
    }
}

impl FileLike for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        "text/plain"
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn last_modified(&self) -> u64 {
        0
    }

    fn stream(&self) -> Source {
        match std::fs::File::open(&self.path) {
            Ok(file) => Source::Reader(Box::new(async_fs::File::from(file))),
            Err(e) => {
                let err = BoxError::from(e);
                Source::Stream(stream::once(async move { Err::<Bytes, _>(err) }).boxed())
            }
        }
    }
}
