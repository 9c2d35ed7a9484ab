/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The server rejected the stored token. The unauthorized hook has
    /// already run by the time this is returned.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}
