use serde::{Deserialize, Serialize};

/// Encoder options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Custom boundary token, generated when absent or empty.
    pub boundary: Option<String>,
    /// Emits additional per part headers, such as `Content-Length`.
    ///
    /// Browsers don't send these, some servers may reject them. Defaults to `false`.
    pub enable_additional_headers: bool,
}

impl Options {
    /// Custom boundary token
    #[must_use]
    pub fn boundary<T: Into<String>>(mut self, boundary: T) -> Self {
        self.boundary.replace(boundary.into());
        self
    }

    /// Emits additional per part headers
    #[must_use]
    pub fn enable_additional_headers(mut self, enable: bool) -> Self {
        self.enable_additional_headers = enable;
        self
    }
}
