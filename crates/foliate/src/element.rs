//! The typed, positioned text atom carried through every pipeline stage.

use std::collections::BTreeMap;

use crate::geometry::BoundingBox;

/// The tagged content variant for an [`Element`].
///
/// Replaces a flat `type` string plus an optional `header_level` field (the
/// source's dynamic-typing approach) with a single exhaustive variant, so
/// `is_text_based`/`is_mergeable` are compiler-checked pattern matches rather
/// than string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementPayload {
    Title,
    TextBlock,
    Paragraph,
    Header { level: u8 },
    Footer,
    Table,
    List,
    ListItem,
    Barcode,
    Image,
    Footnote,
    PageNumber,
    Unknown,
}

impl ElementPayload {
    /// True for kinds that carry reader-facing prose text.
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            ElementPayload::Title
                | ElementPayload::TextBlock
                | ElementPayload::Paragraph
                | ElementPayload::Header { .. }
                | ElementPayload::Footer
                | ElementPayload::ListItem
                | ElementPayload::Footnote
                | ElementPayload::PageNumber
        )
    }

    /// True only for the kinds the merge stages are allowed to fuse together.
    pub fn is_mergeable(&self) -> bool {
        matches!(self, ElementPayload::TextBlock | ElementPayload::Paragraph | ElementPayload::ListItem)
    }

    /// The header level, if this is a `Header` variant.
    pub fn header_level(&self) -> Option<u8> {
        match self {
            ElementPayload::Header { level } => Some(*level),
            _ => None,
        }
    }
}

/// A stable element identifier, assigned at creation by the owning [`crate::pipeline::Pipeline`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed, positioned text observation flowing through the layout reconstruction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementPayload,
    pub bounding_box: BoundingBox,
    pub confidence: f32,
    pub page_number: u32,
    pub text: Option<String>,
    pub metadata: BTreeMap<String, String>,
    /// Logical creation tick, incremented once per element by the driver.
    /// Not wall-clock time — see design notes on determinism.
    pub processed_at: u64,
}

impl Element {
    pub fn new(
        id: ElementId,
        kind: ElementPayload,
        bounding_box: BoundingBox,
        confidence: f32,
        page_number: u32,
        text: Option<String>,
        processed_at: u64,
    ) -> Self {
        Self {
            id,
            kind,
            bounding_box,
            confidence,
            page_number,
            text,
            metadata: BTreeMap::new(),
            processed_at,
        }
    }

    pub fn is_text_based(&self) -> bool {
        self.kind.is_text_based()
    }

    pub fn is_mergeable(&self) -> bool {
        self.kind.is_mergeable()
    }

    pub fn header_level(&self) -> Option<u8> {
        self.kind.header_level()
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Sort elements `(y descending, x ascending)` with a 0.01 y-tie tolerance:
/// elements whose min_y differ by <= 0.01 are treated as the same line and
/// ordered by x instead of by the raw y value.
pub fn sort_reading_order(elements: &mut [Element]) {
    elements.sort_by(|a, b| {
        let ay = a.bounding_box.min_y;
        let by = b.bounding_box.min_y;
        if (ay - by).abs() <= 0.01 {
            a.bounding_box
                .min_x
                .partial_cmp(&b.bounding_box.min_x)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else {
            by.partial_cmp(&ay).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}
