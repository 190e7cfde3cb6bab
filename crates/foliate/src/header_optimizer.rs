//! Page-level false-header filtering and orphan-content repair (§4.7).

use std::collections::HashMap;

use crate::detect::{header_prefix, is_candidate_orphan_header};
use crate::element::{Element, ElementPayload};

/// Demotes headers whose numeric prefix is incoherent with the document's header
/// hierarchy seen so far. Maintains a monotonic frontier of the most-recently-accepted
/// prefix at each level; a header with prefix `p` is accepted if, for every
/// `k < len(p)`, either the frontier has no entry yet at level `k` (no ancestor has
/// been established, so `p` opens a new branch) or `p[1..k]` equals the frontier at
/// level `k` (a valid child or sibling of an open ancestor). Rejected headers are
/// demoted to `Paragraph`.
pub fn filter_false_headers(elements: &[Element]) -> Vec<Element> {
    let mut frontier: HashMap<usize, Vec<u64>> = HashMap::new();
    elements
        .iter()
        .map(|element| {
            let ElementPayload::Header { .. } = element.kind else {
                return element.clone();
            };
            let Some(text) = &element.text else {
                return element.clone();
            };
            let Some(prefix) = header_prefix(text) else {
                return element.clone();
            };
            let components: Vec<u64> = match prefix.split('.').map(|p| p.parse::<u64>()).collect() {
                Ok(components) => components,
                Err(_) => return element.clone(),
            };

            let coherent = (1..components.len())
                .all(|k| frontier.get(&k).is_none_or(|f| f.as_slice() == components[..k]));

            if coherent {
                frontier.insert(components.len(), components.clone());
                element.clone()
            } else {
                let mut demoted = element.clone();
                demoted.kind = ElementPayload::Paragraph;
                demoted
            }
        })
        .collect()
}

fn parse_prefix(prefix: &str) -> Option<(String, u64)> {
    let (base, suffix) = prefix.rsplit_once('.')?;
    let suffix_num: u64 = suffix.parse().ok()?;
    Some((base.to_string(), suffix_num))
}

/// For each non-header element satisfying the candidate-orphan-header heuristic,
/// attempts to infer a missing numeric prefix from the nearest preceding and
/// following headers and, on success, retypes the element to `Header`.
pub fn repair_orphan_headers(elements: &[Element]) -> Vec<Element> {
    let mut out = elements.to_vec();
    for i in 0..out.len() {
        if matches!(out[i].kind, ElementPayload::Header { .. }) {
            continue;
        }
        let Some(text) = out[i].text.clone() else { continue };
        if !is_candidate_orphan_header(&text) {
            continue;
        }

        let prev_prefix = out[..i].iter().rev().find_map(|e| match e.kind {
            ElementPayload::Header { .. } => e.text.as_deref().and_then(header_prefix),
            _ => None,
        });
        let next_prefix = out[i + 1..].iter().find_map(|e| match e.kind {
            ElementPayload::Header { .. } => e.text.as_deref().and_then(header_prefix),
            _ => None,
        });

        let prediction = predict_prefix(prev_prefix.as_deref(), next_prefix.as_deref());

        if let Some(predicted) = prediction {
            let level = predicted.split('.').count() as u8;
            out[i].kind = ElementPayload::Header { level };
            out[i].text = Some(format!("{predicted} {text}"));
        }
    }
    out
}

fn predict_prefix(prev: Option<&str>, next: Option<&str>) -> Option<String> {
    let prev_parsed = prev.and_then(parse_prefix);
    let next_parsed = next.and_then(parse_prefix);

    match (prev_parsed, next_parsed) {
        (Some((prev_base, prev_suffix)), Some((next_base, next_suffix))) if prev_base == next_base => {
            if next_suffix.checked_sub(prev_suffix) == Some(2) {
                Some(format!("{prev_base}.{}", prev_suffix + 1))
            } else {
                None
            }
        }
        (Some((prev_base, prev_suffix)), _) => Some(format!("{prev_base}.{}", prev_suffix + 1)),
        (None, Some((next_base, next_suffix))) if next_suffix > 1 => Some(format!("{next_base}.{}", next_suffix - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;
    use crate::geometry::BoundingBox;

    fn header(id: u64, text: &str, level: u8, min_y: f32) -> Element {
        Element::new(
            ElementId(id),
            ElementPayload::Header { level },
            BoundingBox::new(0.1, min_y, 0.5, min_y + 0.02),
            0.95,
            1,
            Some(text.to_string()),
            0,
        )
    }

    fn para(id: u64, text: &str, min_y: f32) -> Element {
        Element::new(
            ElementId(id),
            ElementPayload::Paragraph,
            BoundingBox::new(0.1, min_y, 0.5, min_y + 0.02),
            0.95,
            1,
            Some(text.to_string()),
            0,
        )
    }

    #[test]
    fn test_accepts_coherent_hierarchy() {
        let elements = vec![
            header(0, "1 Introduction", 1, 0.95),
            header(1, "1.1 Background", 2, 0.90),
            header(2, "1.2 Motivation", 2, 0.85),
        ];
        let filtered = filter_false_headers(&elements);
        assert!(filtered.iter().all(|e| matches!(e.kind, ElementPayload::Header { .. })));
    }

    #[test]
    fn test_demotes_incoherent_header() {
        let elements = vec![
            header(0, "2 Overview", 1, 0.95),
            header(1, "3 Details", 1, 0.90),
            header(2, "7.3 Stray", 2, 0.85),
        ];
        let filtered = filter_false_headers(&elements);
        assert_eq!(filtered[2].kind, ElementPayload::Paragraph);
    }

    #[test]
    fn test_orphan_repair_interpolates_between_neighbors() {
        let elements = vec![header(0, "6.1 A", 2, 0.95), para(1, "访问控制B段落内容", 0.90), header(2, "6.3 C", 2, 0.85)];
        let repaired = repair_orphan_headers(&elements);
        assert_eq!(repaired[1].kind, ElementPayload::Header { level: 2 });
        assert_eq!(repaired[1].text.as_deref(), Some("6.2 访问控制B段落内容"));
    }

    #[test]
    fn test_orphan_repair_with_only_preceding_header() {
        let elements = vec![header(0, "6.1 A", 2, 0.95), para(1, "访问控制B段落内容", 0.90)];
        let repaired = repair_orphan_headers(&elements);
        assert_eq!(repaired[1].text.as_deref(), Some("6.2 访问控制B段落内容"));
    }

    #[test]
    fn test_orphan_repair_leaves_large_gap_unrepaired() {
        let elements = vec![header(0, "6.1 A", 2, 0.95), para(1, "访问控制B段落内容", 0.90), header(2, "6.9 C", 2, 0.85)];
        let repaired = repair_orphan_headers(&elements);
        assert_eq!(repaired[1].kind, ElementPayload::Paragraph);
    }
}
