//! Pattern-based header/list/TOC classification, same-line merging, and
//! element merge policy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ProcessingConfig;
use crate::element::{Element, ElementPayload};
use crate::geometry::{is_vertically_aligned, merge_distance};
use crate::language::Language;

/// The leading numeric prefix of a header candidate, e.g. the `6.1.2` in `6.1.2 Scope`.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*").unwrap());

static ORDERED_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());
static ORDERED_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\)\s").unwrap());
static ALPHA_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]\)\s").unwrap());
static ALPHA_FULLWIDTH_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]）\s").unwrap());
static CIRCLED_NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\u{2460}-\u{2473}]").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-\*]\s").unwrap());

/// Trailing-page-reference stripper for TOC entries: leader dots/spaces, then digits, at end of string.
static TOC_TRAILING_PAGE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)(?:[.·…\s]{2,}\d+)\s*$").unwrap());

const NON_HEADER_PREFIXES: &[&str] = &["本项要求包括：", "应", "应确保", "应指定"];

fn ends_with_terminal_punctuation(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.' | '。' | ';' | '；' | '!' | '！' | '?' | '？'))
}

fn ends_with_continuation_mark(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some(',' | '，' | '；'))
}

fn is_han_char(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn count_han_chars(text: &str) -> usize {
    text.chars().filter(|c| is_han_char(*c)).count()
}

/// Splits `trimmed` into `(numeric_prefix, title)` if it begins with a numeric
/// prefix (`6.1.2`) followed by a title. The separator between prefix and title
/// must be whitespace, UNLESS the title starts directly with a Han character —
/// CJK same-line merges join prefix and title with no space at all (e.g.
/// `"5.1.2访问控制"`), and header re-detection must still recognize the result.
/// Requiring whitespace in the Latin case keeps list markers like `"1. Item"`
/// (a bare ordinal, not a dotted level prefix) from being misread as headers.
fn split_header_prefix(trimmed: &str) -> Option<(&str, &str)> {
    let prefix_match = NUMERIC_PREFIX.find(trimmed)?;
    let prefix = prefix_match.as_str();
    let rest = &trimmed[prefix_match.end()..];
    let rest_trimmed = rest.trim_start();
    let title = if rest_trimmed.len() != rest.len() {
        rest_trimmed
    } else {
        match rest.chars().next() {
            Some(c) if is_han_char(c) => rest,
            _ => return None,
        }
    };
    if title.is_empty() {
        return None;
    }
    Some((prefix, title))
}

/// If `text` has a numeric prefix followed by a title at least 3 characters
/// long, and does not end in terminal punctuation, returns the header level
/// (count of dot-separated components).
pub fn header_level(text: &str) -> Option<u8> {
    let trimmed = text.trim();
    if ends_with_terminal_punctuation(trimmed) {
        return None;
    }
    let (prefix, title) = split_header_prefix(trimmed)?;
    if title.chars().count() < 3 {
        return None;
    }
    Some(prefix.split('.').count() as u8)
}

/// Extracts the numeric prefix itself (e.g. `"6.1.2"`), if `text` is header-shaped.
pub fn header_prefix(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if ends_with_terminal_punctuation(trimmed) {
        return None;
    }
    let (prefix, title) = split_header_prefix(trimmed)?;
    if title.chars().count() < 3 {
        return None;
    }
    Some(prefix.to_string())
}

/// The Chinese-document candidate-orphan-header heuristic (§4.4/§4.7): short lines
/// with several Han characters, no terminal punctuation, and no known non-header lead-in.
pub fn is_candidate_orphan_header(text: &str) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if !(3..=50).contains(&len) {
        return false;
    }
    if ends_with_terminal_punctuation(trimmed) {
        return false;
    }
    if count_han_chars(trimmed) < 3 {
        return false;
    }
    !NON_HEADER_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}

/// Whether `text` matches any recognized list-item prefix. The numeric-header pattern
/// is explicitly excluded — headers win over list items.
pub fn is_list_item_prefix(text: &str) -> bool {
    let trimmed = text.trim_start();
    if header_level(trimmed).is_some() {
        return false;
    }
    ORDERED_DOT.is_match(trimmed)
        || ORDERED_PAREN.is_match(trimmed)
        || ALPHA_PAREN.is_match(trimmed)
        || ALPHA_FULLWIDTH_PAREN.is_match(trimmed)
        || CIRCLED_NUMERAL.is_match(trimmed)
        || BULLET.is_match(trimmed)
}

/// Classifies raw observed text into its initial [`ElementPayload`].
pub fn classify_text(text: &str) -> ElementPayload {
    if let Some(level) = header_level(text) {
        ElementPayload::Header { level }
    } else if is_list_item_prefix(text) {
        ElementPayload::ListItem
    } else {
        ElementPayload::Paragraph
    }
}

/// A page is a TOC page iff `count(header) / count(elements) >= 0.9` and `count(elements) >= 3`.
pub fn is_toc_page(elements: &[Element]) -> bool {
    if elements.len() < 3 {
        return false;
    }
    let headers = elements.iter().filter(|e| matches!(e.kind, ElementPayload::Header { .. })).count();
    (headers as f32 / elements.len() as f32) >= 0.9
}

/// Strips a trailing page-number/leader-dot suffix from a TOC entry. Idempotent.
pub fn toc_normalize(text: &str) -> String {
    match TOC_TRAILING_PAGE_REF.captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str().trim_end().to_string()).unwrap_or_else(|| text.to_string()),
        None => text.to_string(),
    }
}

/// Collapses intra-item whitespace and strips a trailing page-reference suffix.
pub fn normalize_list_item(text: &str) -> String {
    let stripped = toc_normalize(text);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeRelation {
    SameLine,
    SideBySide,
    Diagonal,
    None,
}

fn classify_relation(a: &Element, b: &Element) -> MergeRelation {
    let vertically_aligned = is_vertically_aligned(&a.bounding_box, &b.bounding_box, 0.08);
    let horizontally_stacked = crate::geometry::is_horizontally_aligned(&a.bounding_box, &b.bounding_box, 0.08);
    let dist = merge_distance(&a.bounding_box, &b.bounding_box);
    let mut relation = if vertically_aligned {
        MergeRelation::SameLine
    } else if horizontally_stacked {
        MergeRelation::SideBySide
    } else {
        MergeRelation::Diagonal
    };
    // Hard cap: same-line/side-by-side demoted to diagonal past 0.15 normalized distance.
    if matches!(relation, MergeRelation::SameLine | MergeRelation::SideBySide) && dist > 0.15 {
        relation = MergeRelation::Diagonal;
    }
    relation
}

/// `canMerge(A, B, cfg)`: both mergeable, same page, geometric relation classifies,
/// and edge distance is within the threshold for that relation.
pub fn can_merge(a: &Element, b: &Element, cfg: &ProcessingConfig) -> bool {
    if !a.is_mergeable() || !b.is_mergeable() {
        return false;
    }
    if a.page_number != b.page_number {
        return false;
    }
    let horizontal = cfg.normalized_horizontal_threshold();
    let vertical = cfg.normalized_vertical_threshold();
    let dist = merge_distance(&a.bounding_box, &b.bounding_box);
    match classify_relation(a, b) {
        MergeRelation::SameLine => dist <= horizontal,
        MergeRelation::SideBySide => dist <= vertical,
        MergeRelation::Diagonal => dist <= horizontal.min(vertical),
        MergeRelation::None => false,
    }
}

/// Merges `a` (earlier in reading order) and `b` into a single element: union box,
/// concatenated text with a language-aware separator, min confidence, `a`'s kind.
pub fn merge(a: &Element, b: &Element, language: Language) -> Element {
    let bounding_box = a.bounding_box.union(&b.bounding_box);
    let confidence = a.confidence.min(b.confidence);
    let a_text = a.text_or_empty();
    let b_text = b.text_or_empty();
    let needs_space = language.inserts_space_between_merges()
        && !a_text.ends_with(char::is_whitespace)
        && !b_text.starts_with(char::is_whitespace)
        && !a_text.is_empty()
        && !b_text.is_empty();
    let text = if needs_space { format!("{a_text} {b_text}") } else { format!("{a_text}{b_text}") };

    let mut metadata = a.metadata.clone();
    let merged_from = metadata.get("merged_from").cloned();
    let ids = match merged_from {
        Some(existing) => format!("{existing},{}", b.id),
        None => format!("{},{}", a.id, b.id),
    };
    metadata.insert("merged_from".to_string(), ids);

    Element {
        id: a.id,
        kind: a.kind,
        bounding_box,
        confidence,
        page_number: a.page_number,
        text: Some(text),
        metadata,
        processed_at: a.processed_at,
    }
}

/// Groups maximal runs of vertically-aligned, mergeable consecutive elements (in
/// the input's existing order) and collapses each run by repeated [`merge`]. Must
/// run before header re-detection: prefix tokens and titles often arrive as
/// separate observations on the same baseline.
pub fn same_line_merge(elements: &[Element], cfg: &ProcessingConfig, language: Language) -> Vec<Element> {
    let mut out = Vec::with_capacity(elements.len());
    let mut i = 0;
    while i < elements.len() {
        let mut current = elements[i].clone();
        let mut j = i + 1;
        while j < elements.len() && can_merge(&current, &elements[j], cfg) {
            current = merge(&current, &elements[j], language);
            j += 1;
        }
        out.push(current);
        i = j;
    }
    out
}

/// Re-classifies each element's header/list status from its current text, e.g. after
/// same-line merging has assembled a full header line from fragments. Idempotent.
pub fn redetect_headers(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .map(|e| {
            let mut e = e.clone();
            if let Some(text) = &e.text {
                if matches!(e.kind, ElementPayload::Paragraph | ElementPayload::Header { .. } | ElementPayload::TextBlock)
                {
                    e.kind = classify_text(text);
                }
            }
            e
        })
        .collect()
}
