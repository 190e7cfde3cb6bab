//! Conservative within-page sentence merging for continuation paragraphs (§4.6).

use crate::detect::is_list_item_prefix;
use crate::element::{Element, ElementPayload};
use crate::geometry::{is_horizontally_aligned, merge_distance};
use crate::language::Language;

const VERTICAL_GAP_THRESHOLD: f32 = 0.01;
const SIDE_BY_SIDE_GAP_THRESHOLD: f32 = 0.10;

fn ends_with_terminal_punctuation(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.' | '。' | ';' | '；' | '!' | '！' | '?' | '？'))
}

fn ends_with_continuation_mark(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some(',' | '，' | '；'))
}

fn starts_with_continuation_mark(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some(',' | '，' | '；'))
}

fn is_eligible_continuation(a: &Element, b: &Element) -> bool {
    if !a.is_mergeable() || !b.is_mergeable() {
        return false;
    }
    if matches!(b.kind, ElementPayload::Header { .. }) {
        return false;
    }
    let a_text = a.text_or_empty();
    let b_text = b.text_or_empty();
    if is_list_item_prefix(a_text) || is_list_item_prefix(b_text) {
        return false;
    }

    let a_terminated = ends_with_terminal_punctuation(a_text);
    let a_continuation_mark = ends_with_continuation_mark(a_text);
    let punctuation_allows = !a_terminated || (a_continuation_mark && !starts_with_continuation_mark(b_text));
    if !punctuation_allows {
        return false;
    }

    let vertical_gap = merge_distance(&a.bounding_box, &b.bounding_box);
    let side_by_side = is_horizontally_aligned(&a.bounding_box, &b.bounding_box, 0.02)
        && merge_distance(&a.bounding_box, &b.bounding_box) <= SIDE_BY_SIDE_GAP_THRESHOLD;
    vertical_gap <= VERTICAL_GAP_THRESHOLD || side_by_side
}

/// Scans `elements` (in committed reading order) and fuses adjacent continuation
/// pairs, preserving the earlier element's kind and applying the language-aware
/// separator rule from [`crate::detect::merge`].
pub fn merge_sentences(elements: &[Element], language: Language) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(elements.len());
    for element in elements {
        if let Some(last) = out.last() {
            if last.page_number == element.page_number && is_eligible_continuation(last, element) {
                let merged = crate::detect::merge(last, element, language);
                *out.last_mut().unwrap() = merged;
                continue;
            }
        }
        out.push(element.clone());
    }
    out
}
