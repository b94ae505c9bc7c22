// ABOUTME: Error types for the quiz-slides application
// ABOUTME: Provides structured error handling for loading, composing and packaging

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse problem data: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Path not found: {}", .0.display())]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("PPTX generation error: {0}")]
    PptxError(String),
}

impl From<zip::result::ZipError> for SlideError {
    fn from(err: zip::result::ZipError) -> Self {
        SlideError::PptxError(format!("ZIP operation failed: {}", err))
    }
}

/// Recoverable problem with a slide's picture. The slide is still produced.
#[derive(Error, Debug)]
pub enum ImageWarning {
    #[error("problem {number}: image path not found: {path:?}")]
    NotFound { number: String, path: PathBuf },

    #[error("problem {number}: could not insert image {path:?} ({source})")]
    Unreadable {
        number: String,
        path: PathBuf,
        #[source]
        source: SlideError,
    },
}

pub type Result<T> = std::result::Result<T, SlideError>;
