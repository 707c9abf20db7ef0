//! Streaming `multipart/form-data` encoder, implements [rfc7578]
//!
//! # Example
//!
//! ```rust
//! use bytes::BytesMut;
//! use futures_util::stream::TryStreamExt;
//!
//! use form_data_encoder::{File, FormData, FormDataEncoder, Options};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), form_data_encoder::Error> {
//! let mut form = FormData::new();
//!
//! form.append("field", "Just a random string");
//! form.append("file", File::new("Using files is class amazing", "file.txt"));
//!
//! let encoder = FormDataEncoder::with_options(&form, Options::default().boundary("AaB03x"))?;
//!
//! assert_eq!(
//!     encoder.headers()["content-type"],
//!     "multipart/form-data; boundary=form-data-boundary-AaB03x"
//! );
//!
//! // the encoder can be sent as a request body with hyper, reqwest...
//! let mut stream = encoder.encode();
//! let mut body = BytesMut::new();
//! while let Some(buf) = stream.try_next().await? {
//!     body.extend_from_slice(&buf);
//! }
//!
//! assert_eq!(Some(body.len() as u64), encoder.content_length());
//! # Ok(())
//! # }
//! ```
//!
//! [rfc7578]: <https://tools.ietf.org/html/rfc7578>

#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(missing_docs, rustdoc::missing_doc_code_examples, unreachable_pub)]

mod r#async;
mod chunk;
mod encoder;
mod error;
mod file;
mod form;
mod options;
mod source;
mod utils;

pub use r#async::Encode;

pub use chunk::{chunk, Chunks, MAX_CHUNK_SIZE};

pub use encoder::{FormDataEncoder, Part, Values};

pub use error::Error;

pub use file::{File, FileLike};

pub use form::{FormData, FormDataLike, Value};

pub use options::Options;

pub use source::{BoxError, Source, SourceStream, READ_BUFFER_SIZE};

pub use utils::{
    create_boundary, escape_name, normalize_value, BOUNDARY_PREFIX, BOUNDARY_SIZE,
};

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
