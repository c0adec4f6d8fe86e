use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected {expected} pixels for the image dimensions, got {actual}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} layer labels for the map dimensions, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("invalid layer label {0} (expected 0..=4)")]
    InvalidLabel(u8),

    #[error("analysis cancelled")]
    Cancelled,
}
