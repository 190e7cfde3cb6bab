//! Deterministic in-memory fakes for [`crate::collaborators`], used by this crate's
//! own tests and available to downstream consumers who want to exercise the
//! pipeline without a real OCR/PDF backend.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::collaborators::{OcrOptions, OcrProvider, PdfCollaborator, RasterPage, TextObservation};
use crate::error::FoliateError;

/// An `OcrProvider` backed by a fixed, caller-supplied observation list per page index.
pub struct FakeOcrProvider {
    pages: Mutex<HashMap<u32, Vec<TextObservation>>>,
}

impl FakeOcrProvider {
    pub fn new() -> Self {
        Self { pages: Mutex::new(HashMap::new()) }
    }

    /// Registers the observations to return for `page_number` (1-indexed).
    pub fn with_page(self, page_number: u32, observations: Vec<TextObservation>) -> Self {
        self.pages.lock().unwrap().insert(page_number, observations);
        self
    }
}

impl Default for FakeOcrProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrProvider for FakeOcrProvider {
    async fn recognize(&self, page: &RasterPage, _options: &OcrOptions) -> Result<Vec<TextObservation>, FoliateError> {
        Ok(self.pages.lock().unwrap().get(&page.page_number).cloned().unwrap_or_default())
    }
}

/// A `PdfCollaborator` backed by a fixed page count and per-page embedded text map.
/// `render_page` returns an empty placeholder raster; `FakeOcrProvider` is expected
/// to be driven directly by page number in tests rather than by raster content.
pub struct FakePdfCollaborator {
    page_count: u32,
    embedded_text: HashMap<u32, String>,
}

impl FakePdfCollaborator {
    pub fn new(page_count: u32) -> Self {
        Self { page_count, embedded_text: HashMap::new() }
    }

    pub fn with_embedded_text(mut self, page_number: u32, text: impl Into<String>) -> Self {
        self.embedded_text.insert(page_number, text.into());
        self
    }
}

#[async_trait]
impl PdfCollaborator for FakePdfCollaborator {
    fn page_count(&self, _path: &Path) -> Result<u32, FoliateError> {
        Ok(self.page_count)
    }

    async fn render_page(&self, _path: &Path, page_number: u32) -> Result<RasterPage, FoliateError> {
        if page_number == 0 || page_number > self.page_count {
            return Err(FoliateError::PageOutOfRange { page: page_number });
        }
        Ok(RasterPage { page_number, bytes: Vec::new(), width: 0, height: 0 })
    }

    async fn extract_embedded_text(&self, _path: &Path, page_number: u32) -> Result<Option<String>, FoliateError> {
        Ok(self.embedded_text.get(&page_number).cloned())
    }
}
