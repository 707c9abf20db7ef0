use std::{fmt, sync::Arc};

use bytes::{Bytes, BytesMut};
use http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    HeaderMap, HeaderValue,
};
use tracing::debug;

use crate::{
    escape_name, normalize_value,
    utils::{prefixed_boundary, CRLF, CRLFS, DASHES},
    Error, FileLike, FormDataLike, Options, Result, Value,
};

/// A piece of the encoded form-data, yielded by [`FormDataEncoder::values`].
#[derive(Debug, Clone)]
pub enum Part {
    /// Bytes ready to be sent as-is.
    Bytes(Bytes),
    /// A file whose contents have not been read.
    File(Arc<dyn FileLike>),
}

impl Part {
    /// Gets the size of the part, `None` for a file with unknown size.
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::Bytes(b) => Some(b.len() as u64),
            Self::File(f) => f.size(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    header: Bytes,
    content: Part,
}

#[derive(Debug)]
struct Inner {
    boundary: String,
    content_type: String,
    content_length: Option<u64>,
    headers: HeaderMap,
    footer: Bytes,
    entries: Vec<Entry>,
}

/// Encodes a form into `multipart/form-data`, implements the [encoding algorithm].
///
/// All fields are computed when the encoder is created, the form is captured
/// then, later changes to it are not seen by the encoder.
///
/// [encoding algorithm]: <https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#multipart/form-data-encoding-algorithm>
#[derive(Clone)]
pub struct FormDataEncoder {
    inner: Arc<Inner>,
}

impl FormDataEncoder {
    /// Creates an encoder with a generated boundary.
    ///
    /// # Errors
    ///
    /// See [`FormDataEncoder::with_options`].
    pub fn new<F>(form: &F) -> Result<Self>
    where
        F: FormDataLike + ?Sized,
    {
        Self::with_options(form, Options::default())
    }

    /// Creates an encoder with options.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBoundary`] if the custom boundary contains characters
    /// other than `A-Z a-z 0-9 ' + _ - .`, or is longer than 70 characters
    /// once prefixed with `form-data-boundary-` (51 characters for the token).
    pub fn with_options<F>(form: &F, options: Options) -> Result<Self>
    where
        F: FormDataLike + ?Sized,
    {
        let boundary = prefixed_boundary(options.boundary.as_deref())?;
        let content_type = format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, boundary);

        // `--boundary--\r\n\r\n`
        let mut footer = BytesMut::with_capacity(boundary.len() + 8);
        footer.extend_from_slice(&DASHES);
        footer.extend_from_slice(boundary.as_bytes());
        footer.extend_from_slice(&DASHES);
        footer.extend_from_slice(&CRLFS);

        let entries = form
            .entries()
            .map(|(name, value)| {
                let content = match value {
                    Value::Text(text) => {
                        Part::Bytes(Bytes::from(normalize_value(text).into_owned()))
                    }
                    Value::File(file) => Part::File(Arc::clone(file)),
                };
                Entry {
                    header: part_header(
                        &boundary,
                        name,
                        &content,
                        options.enable_additional_headers,
                    ),
                    content,
                }
            })
            .collect::<Vec<_>>();

        let content_length = content_length(&entries, footer.len());

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type).map_err(|_| Error::InvalidHeader)?,
        );
        if let Some(length) = content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }

        debug!(
            "encoder created, boundary {}, parts {}, length {:?}",
            boundary,
            entries.len(),
            content_length
        );

        Ok(Self {
            inner: Arc::new(Inner {
                boundary,
                content_type,
                content_length,
                headers,
                footer: footer.freeze(),
                entries,
            }),
        })
    }

    /// Gets the boundary, `form-data-boundary-` followed by the token.
    pub fn boundary(&self) -> &str {
        &self.inner.boundary
    }

    /// Gets the `Content-Type` value, `multipart/form-data; boundary=<boundary>`.
    pub fn content_type(&self) -> &str {
        &self.inner.content_type
    }

    /// Gets the total length of the encoded form-data,
    /// `None` when a file of the form has unknown size.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length
    }

    /// Gets the headers, `Content-Type` and `Content-Length` if it's known.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Iterates over the parts with metadata.
    ///
    /// Files are **not** read and values are **not** split into chunks,
    /// see [`FormDataEncoder::encode`] for that.
    pub fn values(&self) -> Values {
        Values {
            inner: Arc::clone(&self.inner),
            index: 0,
            step: Step::Header,
        }
    }
}

impl fmt::Debug for FormDataEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDataEncoder")
            .field("boundary", &self.inner.boundary)
            .field("content_length", &self.inner.content_length)
            .field("parts", &self.inner.entries.len())
            .finish()
    }
}

impl IntoIterator for &FormDataEncoder {
    type Item = Part;
    type IntoIter = Values;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Header,
    Content,
    Crlf,
    Done,
}

/// Iterator returned by [`FormDataEncoder::values`].
///
/// Yields, for every entry, its header, its content and `\r\n`, then the footer.
#[derive(Debug, Clone)]
pub struct Values {
    inner: Arc<Inner>,
    index: usize,
    step: Step,
}

impl Iterator for Values {
    type Item = Part;

    fn next(&mut self) -> Option<Self::Item> {
        let part = match self.step {
            Step::Header => match self.inner.entries.get(self.index) {
                Some(entry) => {
                    self.step = Step::Content;
                    Part::Bytes(entry.header.clone())
                }
                None => {
                    self.step = Step::Done;
                    Part::Bytes(self.inner.footer.clone())
                }
            },
            Step::Content => {
                self.step = Step::Crlf;
                self.inner.entries[self.index].content.clone()
            }
            Step::Crlf => {
                self.index += 1;
                self.step = Step::Header;
                Part::Bytes(Bytes::from_static(&CRLF))
            }
            Step::Done => return None,
        };

        Some(part)
    }
}

/// Builds the header block of a part.
///
/// ```text
/// --<boundary>\r\n
/// Content-Disposition: form-data; name="<name>"[; filename="<filename>"]\r\n
/// [Content-Type: <type>\r\n]
/// [Content-Length: <size>\r\n]
/// \r\n
/// ```
fn part_header(boundary: &str, name: &str, content: &Part, additional: bool) -> Bytes {
    let mut header = BytesMut::with_capacity(boundary.len() + name.len() + 64);

    header.extend_from_slice(&DASHES);
    header.extend_from_slice(boundary.as_bytes());
    header.extend_from_slice(&CRLF);
    header.extend_from_slice(b"Content-Disposition: form-data; name=\"");
    header.extend_from_slice(escape_name(name).as_bytes());
    header.extend_from_slice(b"\"");

    if let Part::File(file) = content {
        let default = mime::APPLICATION_OCTET_STREAM;
        let content_type = match file.content_type() {
            "" => default.as_ref(),
            // a line break would start a new header line
            t if t.contains(['\r', '\n']) => default.as_ref(),
            t => t,
        };

        header.extend_from_slice(b"; filename=\"");
        header.extend_from_slice(escape_name(file.name()).as_bytes());
        header.extend_from_slice(b"\"");
        header.extend_from_slice(&CRLF);
        header.extend_from_slice(b"Content-Type: ");
        header.extend_from_slice(content_type.as_bytes());
    }

    // omitted silently when the size is unknown
    if let Some(size) = content.size().filter(|_| additional) {
        header.extend_from_slice(&CRLF);
        header.extend_from_slice(b"Content-Length: ");
        header.extend_from_slice(size.to_string().as_bytes());
    }

    header.extend_from_slice(&CRLFS);
    header.freeze()
}

/// Sums up headers, contents and separators of all entries plus the footer,
/// `None` once a part has unknown size.
fn content_length(entries: &[Entry], footer: usize) -> Option<u64> {
    entries.iter().try_fold(footer as u64, |length, entry| {
        let size = entry.content.size()?;
        Some(length + entry.header.len() as u64 + size + CRLF.len() as u64)
    })
}
