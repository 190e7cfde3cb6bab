//! Abstract capability interfaces for the OCR engine and PDF renderer (§6, §9).
//!
//! These are the pipeline's only suspension points. Representing them as traits
//! keeps the core testable against deterministic in-memory fakes (`crate::testing`)
//! without binding to a concrete OCR or PDF backend.

use std::path::Path;

use async_trait::async_trait;

use crate::error::FoliateError;
use crate::geometry::BoundingBox;

/// Raw raster bytes for a single rendered page, plus the dimensions OCR needs.
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub page_number: u32,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Hints passed to the OCR collaborator for a single page.
#[derive(Debug, Clone, Default)]
pub struct OcrOptions {
    pub languages: Vec<String>,
    pub custom_words: Vec<String>,
    pub minimum_text_height: Option<f32>,
}

/// A single raw positioned text result returned by an OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObservation {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

/// The OCR engine, injected. Must tolerate pages with no recognizable text by
/// returning `Ok(vec![])`, never an error.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn recognize(&self, page: &RasterPage, options: &OcrOptions) -> Result<Vec<TextObservation>, FoliateError>;
}

/// The PDF-to-raster renderer and embedded-text extractor, injected.
#[async_trait]
pub trait PdfCollaborator: Send + Sync {
    fn page_count(&self, path: &Path) -> Result<u32, FoliateError>;

    async fn render_page(&self, path: &Path, page_number: u32) -> Result<RasterPage, FoliateError>;

    /// Used only as a language-detection shortcut; `Ok(None)` when text can't be recovered.
    async fn extract_embedded_text(&self, path: &Path, page_number: u32) -> Result<Option<String>, FoliateError>;
}
