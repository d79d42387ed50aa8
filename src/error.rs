//! Error types for cyberthum

use thiserror::Error;

/// Main error type for cyberthum operations
#[derive(Debug, Error)]
pub enum ThumbError {
    #[error("Input buffer is empty. Provide a valid YouTube URL.")]
    EmptyInput,

    #[error("The provided URL signature does not match any recognized YouTube patterns: {0}")]
    UnrecognizedUrl(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Image decode error: {0}")]
    Image(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl ThumbError {
    /// User-facing error code shown next to the message
    pub fn code(&self) -> &'static str {
        match self {
            ThumbError::EmptyInput => "EMPTY_SIGNAL",
            ThumbError::UnrecognizedUrl(_) => "PROTOCOL_ERROR",
            ThumbError::Http(_) | ThumbError::Status(_) => "NETWORK_ERROR",
            ThumbError::Io(_) => "IO_ERROR",
            ThumbError::UrlError(_) => "URL_ERROR",
            ThumbError::Image(_) => "IMAGE_ERROR",
            ThumbError::Generic(_) => "GENERIC_ERROR",
        }
    }
}

impl From<image::ImageError> for ThumbError {
    fn from(err: image::ImageError) -> Self {
        ThumbError::Image(err.to_string())
    }
}
