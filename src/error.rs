//! Error type shared by every stage of the dome pipeline.

/// All the ways building a dome or placing its sun can fail.
///
/// The validation variants carry the offending input so the caller can turn
/// them into a user-facing message; nothing in this crate retries.
#[derive(thiserror::Error, Debug)]
pub enum DomeError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid radius {0}, expected a finite value greater than zero")]
    InvalidRadius(f64),

    #[error("coordinate ({u}, {v}) lies outside the unit square")]
    OutOfRangeCoordinate { u: f64, v: f64 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomeError {
    pub fn image<T: ToString>(msg: T) -> Self {
        DomeError::InvalidImage(msg.to_string())
    }

    pub fn settings<T: ToString>(msg: T) -> Self {
        DomeError::InvalidSettings(msg.to_string())
    }
}

pub type DomeResult<T> = Result<T, DomeError>;
