//! Concrete Markdown emitter (§6): renders the committed element stream to text.

use crate::element::{Element, ElementPayload};

/// Renders a committed element stream to Markdown, optionally prepending a Table
/// of Contents built from title/header elements.
pub struct MarkdownEmitter {
    add_table_of_contents: bool,
}

impl MarkdownEmitter {
    pub fn new(add_table_of_contents: bool) -> Self {
        Self { add_table_of_contents }
    }

    pub fn render(&self, elements: &[Element]) -> String {
        let mut out = String::new();
        if self.add_table_of_contents {
            if let Some(toc) = render_table_of_contents(elements) {
                out.push_str(&toc);
                out.push('\n');
            }
        }
        for element in elements {
            out.push_str(&render_element(element));
            out.push('\n');
        }
        out
    }
}

fn render_element(element: &Element) -> String {
    let text = element.text_or_empty();
    match element.kind {
        ElementPayload::Title => format!("# {text}\n"),
        ElementPayload::Header { level } => {
            let hashes = "#".repeat(level.max(1) as usize);
            format!("{hashes} {text}\n")
        }
        ElementPayload::Paragraph | ElementPayload::TextBlock | ElementPayload::Unknown => format!("{text}\n"),
        ElementPayload::ListItem => format!("- {text}\n"),
        ElementPayload::List => format!("{text}\n"),
        ElementPayload::Table => format!("```\n{text}\n```\n"),
        ElementPayload::Footer => format!("*{text}*\n"),
        ElementPayload::Footnote => format!("^[{text}]\n"),
        ElementPayload::PageNumber => format!("**Page {text}**\n"),
        ElementPayload::Image => format!("![{text}]({text})\n"),
        ElementPayload::Barcode => format!("`{text}`\n"),
    }
}

/// Builds a Table of Contents entry list from title/header elements, linked by
/// indentation level (titles at level 0, headers indented two spaces per level).
fn render_table_of_contents(elements: &[Element]) -> Option<String> {
    let mut entries = Vec::new();
    for element in elements {
        match element.kind {
            ElementPayload::Title => entries.push(format!("- {}", element.text_or_empty())),
            ElementPayload::Header { level } => {
                let indent = "  ".repeat(level.saturating_sub(1) as usize);
                entries.push(format!("{indent}- {}", element.text_or_empty()));
            }
            _ => {}
        }
    }
    if entries.is_empty() {
        return None;
    }
    let mut toc = String::from("## Table of Contents\n\n");
    toc.push_str(&entries.join("\n"));
    toc.push('\n');
    Some(toc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;
    use crate::geometry::BoundingBox;

    fn elem(kind: ElementPayload, text: &str) -> Element {
        Element::new(ElementId(0), kind, BoundingBox::new(0.0, 0.0, 0.1, 0.1), 0.9, 1, Some(text.to_string()), 0)
    }

    #[test]
    fn test_renders_header_with_repeated_hashes() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::Header { level: 3 }, "Access Control")]);
        assert_eq!(rendered, "### Access Control\n\n");
    }

    #[test]
    fn test_renders_title() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::Title, "Document Title")]);
        assert_eq!(rendered, "# Document Title\n\n");
    }

    #[test]
    fn test_renders_list_item() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::ListItem, "First item")]);
        assert_eq!(rendered, "- First item\n\n");
    }

    #[test]
    fn test_renders_table_as_code_fence() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::Table, "a | b")]);
        assert_eq!(rendered, "```\na | b\n```\n\n");
    }

    #[test]
    fn test_renders_footer_as_italic() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::Footer, "Confidential")]);
        assert_eq!(rendered, "*Confidential*\n\n");
    }

    #[test]
    fn test_renders_page_number() {
        let emitter = MarkdownEmitter::new(false);
        let rendered = emitter.render(&[elem(ElementPayload::PageNumber, "3")]);
        assert_eq!(rendered, "**Page 3**\n\n");
    }

    #[test]
    fn test_table_of_contents_prepended_when_enabled() {
        let emitter = MarkdownEmitter::new(true);
        let elements = vec![elem(ElementPayload::Title, "Doc"), elem(ElementPayload::Header { level: 1 }, "Intro")];
        let rendered = emitter.render(&elements);
        assert!(rendered.starts_with("## Table of Contents"));
        assert!(rendered.contains("- Doc"));
        assert!(rendered.contains("- Intro"));
    }

    #[test]
    fn test_no_table_of_contents_when_disabled() {
        let emitter = MarkdownEmitter::new(false);
        let elements = vec![elem(ElementPayload::Title, "Doc")];
        let rendered = emitter.render(&elements);
        assert!(!rendered.contains("Table of Contents"));
    }

    #[test]
    fn test_no_table_of_contents_when_no_headers() {
        let emitter = MarkdownEmitter::new(true);
        let elements = vec![elem(ElementPayload::Paragraph, "Just prose")];
        let rendered = emitter.render(&elements);
        assert!(!rendered.contains("Table of Contents"));
    }
}
