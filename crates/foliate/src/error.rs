//! Error types surfaced by the core pipeline.

use thiserror::Error;

/// Errors surfaced by the layout reconstruction pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum FoliateError {
    #[error("document not found")]
    DocumentNotFound,

    #[error("unsupported document format")]
    UnsupportedFormat,

    #[error("page {page} is out of range")]
    PageOutOfRange { page: u32 },

    #[error("OCR failed on page {page}: {reason}")]
    OcrFailed { page: u32, reason: String },

    #[error("image processing failed: {reason}")]
    ImageProcessingFailed { reason: String },

    #[error("language detection failed: {reason}")]
    LanguageDetectionFailed { reason: String },

    #[error("no elements to process")]
    NoElementsToProcess,

    #[error("invalid element type: {detail}")]
    InvalidElementType { detail: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating a [`crate::config::PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid region {field}: expected [min_y, max_y] with min_y <= max_y, got {min_y}..{max_y}")]
    InvalidRegion { field: &'static str, min_y: f32, max_y: f32 },
}

pub type Result<T> = std::result::Result<T, FoliateError>;
