//! Stitches sentences split across page boundaries (§4.8).

use crate::detect::{is_list_item_prefix, is_toc_page};
use crate::element::{Element, ElementPayload};
use crate::language::Language;

const PAGE_END_Y_THRESHOLD: f32 = 0.2;

fn ends_with_terminal_punctuation(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('.' | '。' | ';' | '；' | '!' | '！' | '?' | '？'))
}

/// Whether the cross-page optimizer should be skipped entirely for this pair.
pub fn is_suppressed(prev_page: &[Element], curr_page: &[Element]) -> bool {
    if is_toc_page(prev_page) || is_toc_page(curr_page) {
        return true;
    }
    match prev_page.last() {
        Some(last) => last.bounding_box.min_y >= PAGE_END_Y_THRESHOLD,
        None => true,
    }
}

/// Stitches `prev_page`'s tail paragraph onto `curr_page`'s head paragraph when the
/// continuation heuristic fires. Returns the possibly-modified `(prev_page, curr_page)`.
/// A no-op if suppression conditions hold or the heuristic does not fire.
pub fn optimize_cross_page(
    prev_page: &[Element],
    curr_page: &[Element],
    language: Language,
) -> (Vec<Element>, Vec<Element>) {
    if is_suppressed(prev_page, curr_page) {
        return (prev_page.to_vec(), curr_page.to_vec());
    }

    let Some(last) = prev_page.last() else {
        return (prev_page.to_vec(), curr_page.to_vec());
    };
    let Some(first) = curr_page.first() else {
        return (prev_page.to_vec(), curr_page.to_vec());
    };

    let eligible = last.is_mergeable()
        && first.is_mergeable()
        && !ends_with_terminal_punctuation(last.text_or_empty())
        && !is_list_item_prefix(first.text_or_empty())
        && !matches!(first.kind, ElementPayload::Header { .. });

    if !eligible {
        return (prev_page.to_vec(), curr_page.to_vec());
    }

    let merged = crate::detect::merge(last, first, language);
    let mut new_prev = prev_page.to_vec();
    *new_prev.last_mut().unwrap() = merged;

    let new_curr = curr_page[1..].to_vec();
    (new_prev, new_curr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;
    use crate::geometry::BoundingBox;

    fn para(id: u64, text: &str, page: u32, min_y: f32) -> Element {
        Element::new(
            ElementId(id),
            ElementPayload::Paragraph,
            BoundingBox::new(0.1, min_y, 0.4, min_y + 0.02),
            0.95,
            page,
            Some(text.to_string()),
            0,
        )
    }

    #[test]
    fn test_stitches_across_page_boundary() {
        let prev = vec![para(0, "The quick brown fox jumps", 1, 0.08)];
        let curr = vec![para(1, "over the lazy dog.", 2, 0.92)];
        let (new_prev, new_curr) = optimize_cross_page(&prev, &curr, Language::English);
        assert_eq!(new_prev.len(), 1);
        assert_eq!(new_prev[0].text.as_deref(), Some("The quick brown fox jumps over the lazy dog."));
        assert!(new_curr.is_empty());
    }

    #[test]
    fn test_suppressed_when_prev_page_ends_high() {
        let prev = vec![para(0, "Ends mid-page", 1, 0.55)];
        let curr = vec![para(1, "continuation text", 2, 0.92)];
        let (new_prev, new_curr) = optimize_cross_page(&prev, &curr, Language::English);
        assert_eq!(new_prev[0].text.as_deref(), Some("Ends mid-page"));
        assert_eq!(new_curr[0].text.as_deref(), Some("continuation text"));
    }

    #[test]
    fn test_suppressed_near_toc_page() {
        let mut curr = Vec::new();
        for i in 0..10 {
            curr.push(Element::new(
                ElementId(i),
                ElementPayload::Header { level: 1 },
                BoundingBox::new(0.1, 1.0 - i as f32 * 0.05, 0.5, 1.02 - i as f32 * 0.05),
                0.9,
                2,
                Some("entry".to_string()),
                0,
            ));
        }
        let prev = vec![para(0, "no terminal punctuation", 1, 0.08)];
        assert!(is_suppressed(&prev, &curr));
        let (new_prev, new_curr) = optimize_cross_page(&prev, &curr, Language::English);
        assert_eq!(new_prev[0].text.as_deref(), Some("no terminal punctuation"));
        assert_eq!(new_curr.len(), curr.len());
    }

    #[test]
    fn test_no_change_when_first_is_list_item() {
        let prev = vec![para(0, "Some text here", 1, 0.08)];
        let curr = vec![para(1, "1. First item", 2, 0.92)];
        let (new_prev, _) = optimize_cross_page(&prev, &curr, Language::English);
        assert_eq!(new_prev[0].text.as_deref(), Some("Some text here"));
    }

    #[test]
    fn test_empty_prev_page_is_noop() {
        let prev: Vec<Element> = Vec::new();
        let curr = vec![para(1, "text", 2, 0.92)];
        let (new_prev, new_curr) = optimize_cross_page(&prev, &curr, Language::English);
        assert!(new_prev.is_empty());
        assert_eq!(new_curr.len(), 1);
    }
}
