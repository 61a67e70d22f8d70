//! Text cells, raw markdown and separators.

use once_cell::sync::Lazy;
use regex::Regex;

use deepnote_core::model::Block;

use crate::errors::BlockResult;
use crate::registry::MarkupKind;

static HEADING_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+").unwrap());
static BULLET_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+").unwrap());
static TODO_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+\[[ xX]\]\s*").unwrap());
static CALLOUT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s*").unwrap());

const PARAGRAPH_ESCAPED: &[char] = &['\\', '*', '_', '`', '[', ']', '(', ')'];

pub const SEPARATOR: &str = "<hr>";

/// Markdown for `markdown`, text cells and separators. Images are handled in
/// `super::image`.
pub fn markdown(block: &Block, kind: MarkupKind) -> BlockResult<String> {
    let content = block.content_str();
    let out = match kind {
        MarkupKind::Markdown => content.to_string(),
        MarkupKind::Heading1 => format!("# {content}"),
        MarkupKind::Heading2 => format!("## {content}"),
        MarkupKind::Heading3 => format!("### {content}"),
        MarkupKind::Paragraph => escape_paragraph(content),
        MarkupKind::Bullet => format!("- {content}"),
        MarkupKind::Todo => {
            let checked = match &block.metadata {
                Some(deepnote_core::model::BlockMetadata::Text(m)) => m.checked.unwrap_or(false),
                _ => false,
            };
            format!("- [{}] {content}", if checked { "x" } else { " " })
        }
        MarkupKind::Callout => format!("> {content}"),
        MarkupKind::Separator => SEPARATOR.to_string(),
        MarkupKind::Image => return super::image::markdown(block),
    };
    Ok(out)
}

/// Backslash-escape markdown-significant characters, then a trailing period.
pub fn escape_paragraph(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 8);
    for ch in content.chars() {
        if PARAGRAPH_ESCAPED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    if out.ends_with('.') {
        out.pop();
        out.push_str("\\.");
    }
    out
}

/// Remove the kind's leading markdown marker, then trim. Only text cells are
/// strippable; the caller checks that.
pub fn strip(block: &Block, kind: MarkupKind) -> String {
    let content = block.content_str();
    let prefix: Option<&Regex> = match kind {
        MarkupKind::Heading1 | MarkupKind::Heading2 | MarkupKind::Heading3 => Some(&*HEADING_PREFIX_RE),
        MarkupKind::Bullet => Some(&*BULLET_PREFIX_RE),
        MarkupKind::Todo => Some(&*TODO_PREFIX_RE),
        MarkupKind::Callout => Some(&*CALLOUT_PREFIX_RE),
        _ => None,
    };
    match prefix {
        Some(re) => re.replace(content, "").trim().to_string(),
        None => content.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::block;
    use deepnote_core::model::BlockKind;
    use serde_json::json;

    fn md(kind: BlockKind, markup: MarkupKind, content: &str) -> String {
        markdown(&block(kind, content, json!({})), markup).unwrap()
    }

    #[test]
    fn headings_bullets_callouts() {
        assert_eq!(md(BlockKind::TextCellH1, MarkupKind::Heading1, "Main Title"), "# Main Title");
        assert_eq!(md(BlockKind::TextCellH2, MarkupKind::Heading2, "Section Title"), "## Section Title");
        assert_eq!(md(BlockKind::TextCellH3, MarkupKind::Heading3, "Subsection"), "### Subsection");
        assert_eq!(md(BlockKind::TextCellBullet, MarkupKind::Bullet, "List item"), "- List item");
        assert_eq!(md(BlockKind::TextCellCallout, MarkupKind::Callout, "Important note"), "> Important note");
    }

    #[test]
    fn paragraph_escaping() {
        assert_eq!(escape_paragraph("This is a paragraph."), "This is a paragraph\\.");
        assert_eq!(escape_paragraph("a *b* _c_ [d](e)"), r"a \*b\* \_c\_ \[d\]\(e\)");
        assert_eq!(escape_paragraph("1.5 mid"), "1.5 mid");
    }

    #[test]
    fn todo_checkbox_state() {
        let done = block(BlockKind::TextCellTodo, "Completed task", json!({ "checked": true }));
        assert_eq!(markdown(&done, MarkupKind::Todo).unwrap(), "- [x] Completed task");
        let open = block(BlockKind::TextCellTodo, "Task to do", json!({ "checked": false }));
        assert_eq!(markdown(&open, MarkupKind::Todo).unwrap(), "- [ ] Task to do");
        assert_eq!(md(BlockKind::TextCellTodo, MarkupKind::Todo, "Task"), "- [ ] Task");
    }

    #[test]
    fn markdown_and_separator() {
        assert_eq!(md(BlockKind::Markdown, MarkupKind::Markdown, "# raw *md*"), "# raw *md*");
        assert_eq!(md(BlockKind::Separator, MarkupKind::Separator, ""), "<hr>");
    }

    #[test]
    fn strip_prefixes() {
        let s = |kind, markup, content| strip(&block(kind, content, json!({})), markup);
        assert_eq!(s(BlockKind::TextCellH1, MarkupKind::Heading1, "# Title"), "Title");
        assert_eq!(s(BlockKind::TextCellH2, MarkupKind::Heading2, "## Section"), "Section");
        assert_eq!(s(BlockKind::TextCellH3, MarkupKind::Heading3, "#### Subsubsection"), "Subsubsection");
        assert_eq!(s(BlockKind::TextCellBullet, MarkupKind::Bullet, "- List item"), "List item");
        assert_eq!(s(BlockKind::TextCellTodo, MarkupKind::Todo, "- [ ] Task"), "Task");
        assert_eq!(s(BlockKind::TextCellTodo, MarkupKind::Todo, "- [x] Completed"), "Completed");
        assert_eq!(s(BlockKind::TextCellCallout, MarkupKind::Callout, "> Note"), "Note");
        assert_eq!(s(BlockKind::TextCellP, MarkupKind::Paragraph, "  some text  "), "some text");
    }

    #[test]
    fn strip_leaves_unprefixed_text() {
        let b = block(BlockKind::TextCellH1, "Plain heading", json!({}));
        assert_eq!(strip(&b, MarkupKind::Heading1), "Plain heading");
    }
}
