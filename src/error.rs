use thiserror::Error;

/// Form-data encoder Error
#[derive(Debug, Error)]
pub enum Error {
    /// IO Error
    #[error(transparent)]
    Stream(#[from] std::io::Error),

    /// Box Error
    #[error(transparent)]
    BoxError(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid boundary
    #[error("invalid boundary `{0}`")]
    InvalidBoundary(String),

    /// Invalid header value
    #[error("invalid header value")]
    InvalidHeader,

    /// Unsupported data source
    #[error("unsupported data source: expected either a byte stream or an async reader")]
    UnsupportedSource,
}
