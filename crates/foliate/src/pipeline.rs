//! Per-document driver: orders the stages per page, manages the look-back
//! buffer, tracks per-page language, and commits elements (§4.9).

use std::path::Path;

use tracing::warn;

use crate::collaborators::{OcrOptions, OcrProvider, PdfCollaborator};
use crate::config::PipelineConfig;
use crate::cross_page::{is_suppressed, optimize_cross_page};
use crate::detect::{
    classify_text, is_toc_page, normalize_list_item, redetect_headers, same_line_merge, toc_normalize,
};
use crate::element::{sort_reading_order, Element, ElementId, ElementPayload};
use crate::error::{FoliateError, Result};
use crate::filter::{filter_observations, Observation};
use crate::header_optimizer::{filter_false_headers, repair_orphan_headers};
use crate::language::{detect_language, Language};
use crate::merge::merge_sentences;

/// The committed output of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub elements: Vec<Element>,
    /// Non-fatal warnings accumulated during the run (e.g. a page's OCR call failed).
    pub warnings: Vec<String>,
}

/// Per-document driver over a generic OCR/PDF collaborator pair.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    next_id: u64,
    next_tick: u64,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config, next_id: 0, next_tick: 0 }
    }

    fn alloc_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    /// Runs the full pipeline over `path` using the given collaborators.
    pub async fn run<O, P>(&mut self, path: &Path, ocr: &O, pdf: &P) -> Result<PipelineResult>
    where
        O: OcrProvider,
        P: PdfCollaborator,
    {
        self.run_impl(path, ocr, pdf).await
    }

    /// Blocking entry point for callers without an async runtime already running,
    /// mirroring the teacher's `extract_file_sync`/`extract_file` pairing.
    #[cfg(feature = "tokio-runtime")]
    pub fn run_sync<O, P>(&mut self, path: &Path, ocr: &O, pdf: &P) -> Result<PipelineResult>
    where
        O: OcrProvider,
        P: PdfCollaborator,
    {
        let runtime = tokio::runtime::Runtime::new().map_err(FoliateError::Io)?;
        runtime.block_on(self.run_impl(path, ocr, pdf))
    }

    async fn run_impl<O, P>(&mut self, path: &Path, ocr: &O, pdf: &P) -> Result<PipelineResult>
    where
        O: OcrProvider,
        P: PdfCollaborator,
    {
        if !path.exists() {
            return Err(FoliateError::DocumentNotFound);
        }
        let page_count = pdf.page_count(path)?;
        if page_count == 0 {
            return Err(FoliateError::NoElementsToProcess);
        }

        let mut result = PipelineResult::default();
        let mut prev_page: Option<(Vec<Element>, Language)> = None;

        for page_number in 1..=page_count {
            let raster = pdf.render_page(path, page_number).await;
            let raster = match raster {
                Ok(raster) => raster,
                Err(err) => {
                    result.warnings.push(format!("page {page_number}: {err}"));
                    warn!(page = page_number, error = %err, "page render failed");
                    continue;
                }
            };

            let options = OcrOptions {
                languages: self.config.ocr.languages.clone(),
                custom_words: self.config.ocr.custom_words.clone(),
                minimum_text_height: None,
            };
            let raw_observations = match ocr.recognize(&raster, &options).await {
                Ok(observations) => observations,
                Err(err) => {
                    result.warnings.push(format!("page {page_number}: OCR failed: {err}"));
                    warn!(page = page_number, error = %err, "OCR failed");
                    Vec::new()
                }
            };

            let observations: Vec<Observation> = raw_observations
                .into_iter()
                .map(|o| Observation { text: o.text, bounding_box: o.bounding_box, confidence: o.confidence })
                .collect();
            let filtered = filter_observations(observations, &self.config.processing);

            let mut elements: Vec<Element> = filtered
                .into_iter()
                .map(|obs| {
                    let kind = classify_text(&obs.text);
                    Element::new(
                        self.alloc_id(),
                        kind,
                        obs.bounding_box,
                        obs.confidence,
                        page_number,
                        Some(obs.text),
                        self.alloc_tick(),
                    )
                })
                .collect();

            sort_reading_order(&mut elements);

            let embedded_text = pdf.extract_embedded_text(path, page_number).await.unwrap_or(None);
            let language_source = embedded_text.unwrap_or_else(|| {
                elements.iter().filter_map(|e| e.text.as_deref()).collect::<Vec<_>>().join(" ")
            });
            let (language, _confidence) = detect_language(&language_source);

            elements = same_line_merge(&elements, &self.config.processing, language);
            elements = redetect_headers(&elements);

            if is_toc_page(&elements) {
                elements = repair_orphan_headers(&elements);
                elements = elements
                    .into_iter()
                    .map(|mut e| {
                        if let Some(text) = e.text.clone() {
                            e.text = Some(toc_normalize(&text));
                        }
                        e
                    })
                    .collect();
            } else {
                elements = filter_false_headers(&elements);
                elements = repair_orphan_headers(&elements);
            }

            if let Some((prev_elements, prev_language)) = prev_page.take() {
                let (mut new_prev, new_curr) = if is_suppressed(&prev_elements, &elements) {
                    (prev_elements, elements)
                } else {
                    optimize_cross_page(&prev_elements, &elements, prev_language)
                };

                new_prev = merge_sentences(&new_prev, prev_language);
                new_prev = normalize_list_items(&new_prev);
                result.elements.extend(new_prev);

                prev_page = Some((new_curr, language));
            } else {
                prev_page = Some((elements, language));
            }
        }

        if let Some((last_elements, last_language)) = prev_page.take() {
            let mut committed = merge_sentences(&last_elements, last_language);
            committed = normalize_list_items(&committed);
            result.elements.extend(committed);
        }

        if result.elements.is_empty() && result.warnings.is_empty() {
            return Err(FoliateError::NoElementsToProcess);
        }

        Ok(result)
    }
}

fn normalize_list_items(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .map(|e| {
            let mut e = e.clone();
            if matches!(e.kind, ElementPayload::ListItem) {
                if let Some(text) = &e.text {
                    e.text = Some(normalize_list_item(text));
                }
            }
            e
        })
        .collect()
}
