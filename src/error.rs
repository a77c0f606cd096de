use thiserror::Error;

/// Errors produced while turning a translation request into rendered bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The locale list was empty, contained unsafe characters, or a segment
    /// failed the locale grammar.
    #[error("invalid locale format: {0:?}")]
    InvalidLocaleFormat(String),

    /// The domain name contains characters that are not allowed in a
    /// domain identifier.
    #[error("invalid domain identifier: {0:?}")]
    InvalidDomain(String),

    /// The requested encoding is neither the data document nor the script
    /// fragment.
    #[error("unsupported format: {0:?}")]
    UnsupportedFormat(String),

    /// A cache key failed re-validation before touching storage.
    #[error("invalid cache key: {0:?}")]
    InvalidCacheKey(String),

    /// Storing a rendered entry failed. Never fatal to a request.
    #[error("failed to write cache entry {key}: {source}")]
    CacheWriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The JSON encoder failed. Writing to memory does not fail in practice.
    #[error("failed to encode output: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl RenderError {
    /// Whether the HTTP boundary should answer this error with "not found".
    pub fn is_not_found(&self) -> bool {
        !matches!(
            self,
            RenderError::CacheWriteFailed { .. } | RenderError::Encoding(_)
        )
    }
}
