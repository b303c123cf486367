use core::fmt;

/// Errors surfaced by frame ingest, configuration I/O and frame saving.
#[derive(Debug)]
pub enum Error {
    /// Raw buffer is too small for the declared frame geometry.
    BufferTooSmall { expected: usize, actual: usize },
    /// Raw frame declares a pixel layout the ingest path does not handle.
    UnsupportedPixelLayout { bits_per_pixel: u32 },
    /// Declared pitch is smaller than one row of pixels.
    InvalidPitch { pitch: usize, row_bytes: usize },
    Image(image::ImageError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Time(time::error::Format),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { expected, actual } => {
                write!(f, "raw buffer too small: expected {expected} bytes, got {actual}")
            }
            Self::UnsupportedPixelLayout { bits_per_pixel } => {
                write!(f, "unsupported pixel layout: {bits_per_pixel} bits per pixel")
            }
            Self::InvalidPitch { pitch, row_bytes } => {
                write!(f, "pitch {pitch} smaller than row size {row_bytes}")
            }
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Time(e) => write!(f, "timestamp format error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Time(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<time::error::Format> for Error {
    fn from(e: time::error::Format) -> Self {
        Self::Time(e)
    }
}
