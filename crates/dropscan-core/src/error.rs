use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DropscanError {
    #[error("Could not open video {}: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("No oil drop detected (video might be empty or too dark)")]
    NoDetection,

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DropscanError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DropscanError>;
