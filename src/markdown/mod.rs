//! Line-oriented markdown classification.
//!
//! Not CommonMark: every line is classified on its own
//! by prefix, except for fenced code which spans lines until the closing
//! fence. Inline styling inside a block is left to the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

pub mod spans;

pub use spans::{parse_image, parse_link, parse_numbered, parse_task};
pub use spans::{ImageRef, LinkRef, NumberedItem, TaskItem};

const FENCE: &str = "```";
pub const TASK_CHECKED: &str = "[x] ";
pub const TASK_UNCHECKED: &str = "[ ] ";

static NUMBERED_POINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\. ").expect("valid numbered point regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BlockType {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletPoint,
    NumberedPoint,
    Quote,
    Code,
    CodeBlock,
    Image,
    Task,
    Divider,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
}

impl MarkdownBlock {
    pub fn new(block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            block_type,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Emit a code block for a fence still open at end of input instead of
    /// discarding what it collected.
    pub flush_unterminated_fence: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            flush_unterminated_fence: true,
        }
    }
}

#[derive(Debug)]
enum FenceState {
    Outside,
    Inside { buffer: String },
}

pub fn parse_markdown(text: &str) -> Vec<MarkdownBlock> {
    parse_markdown_with(text, &MarkdownOptions::default())
}

pub fn parse_markdown_with(text: &str, options: &MarkdownOptions) -> Vec<MarkdownBlock> {
    let mut blocks = Vec::new();
    let mut state = FenceState::Outside;
    for line in text.lines() {
        state = step(state, line, &mut blocks);
    }

    if let FenceState::Inside { buffer } = state {
        if options.flush_unterminated_fence {
            blocks.push(MarkdownBlock::new(BlockType::CodeBlock, buffer));
        } else {
            tracing::debug!(
                dropped_bytes = buffer.len(),
                "discarding unterminated code fence"
            );
        }
    }
    blocks
}

fn step(state: FenceState, line: &str, blocks: &mut Vec<MarkdownBlock>) -> FenceState {
    match state {
        FenceState::Outside if opens_fence(line) => FenceState::Inside {
            buffer: String::new(),
        },
        FenceState::Outside => {
            if let Some(block) = classify_line(line) {
                blocks.push(block);
            }
            FenceState::Outside
        }
        FenceState::Inside { buffer } if closes_fence(line) => {
            blocks.push(MarkdownBlock::new(BlockType::CodeBlock, buffer));
            FenceState::Outside
        }
        FenceState::Inside { mut buffer } => {
            buffer.push_str(line);
            buffer.push('\n');
            FenceState::Inside { buffer }
        }
    }
}

/// A bare fence, optionally followed by a one-word language tag.
fn opens_fence(line: &str) -> bool {
    match line.trim().strip_prefix(FENCE) {
        Some(tag) => !tag.contains(|ch: char| ch.is_whitespace() || ch == '`'),
        None => false,
    }
}

fn closes_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Classifies a single line outside a fence. Blank lines yield `None`.
pub fn classify_line(line: &str) -> Option<MarkdownBlock> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let prefixed = [
        ("# ", BlockType::Heading1),
        ("## ", BlockType::Heading2),
        ("### ", BlockType::Heading3),
    ];
    for (prefix, block_type) in prefixed {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Some(MarkdownBlock::new(block_type, rest.trim()));
        }
    }

    if let Some(rest) = trimmed.strip_prefix("- [ ] ") {
        return Some(task_block(TASK_UNCHECKED, rest));
    }
    if let Some(rest) = trimmed
        .strip_prefix("- [x] ")
        .or_else(|| trimmed.strip_prefix("- [X] "))
    {
        return Some(task_block(TASK_CHECKED, rest));
    }

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Some(MarkdownBlock::new(BlockType::BulletPoint, rest.trim()));
    }
    if let Some(rest) = trimmed.strip_prefix("> ") {
        return Some(MarkdownBlock::new(BlockType::Quote, rest.trim()));
    }
    if trimmed.starts_with("![") {
        return Some(MarkdownBlock::new(BlockType::Image, trimmed));
    }
    if trimmed.starts_with('[') && trimmed.contains("](") {
        return Some(MarkdownBlock::new(BlockType::Link, trimmed));
    }
    if trimmed == "---" {
        return Some(MarkdownBlock::new(BlockType::Divider, ""));
    }
    if trimmed.len() > 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        let inner = &trimmed[1..trimmed.len() - 1];
        return Some(MarkdownBlock::new(BlockType::Code, inner));
    }
    if NUMBERED_POINT.is_match(trimmed) {
        return Some(MarkdownBlock::new(BlockType::NumberedPoint, trimmed));
    }
    Some(MarkdownBlock::new(BlockType::Paragraph, trimmed))
}

fn task_block(marker: &str, rest: &str) -> MarkdownBlock {
    MarkdownBlock::new(BlockType::Task, format!("{marker}{}", rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::sample::SHOWCASE_DOCUMENT;
    use strum::IntoEnumIterator;

    fn types(blocks: &[MarkdownBlock]) -> Vec<BlockType> {
        blocks.iter().map(|block| block.block_type).collect()
    }

    #[test]
    fn classifies_prefixes_in_priority_order() {
        let blocks = parse_markdown(
            "# One\n## Two\n### Three\n- [ ] open\n- [x] done\n- dash\n* star\n> quoted\n",
        );
        assert_eq!(
            blocks,
            vec![
                MarkdownBlock::new(BlockType::Heading1, "One"),
                MarkdownBlock::new(BlockType::Heading2, "Two"),
                MarkdownBlock::new(BlockType::Heading3, "Three"),
                MarkdownBlock::new(BlockType::Task, "[ ] open"),
                MarkdownBlock::new(BlockType::Task, "[x] done"),
                MarkdownBlock::new(BlockType::BulletPoint, "dash"),
                MarkdownBlock::new(BlockType::BulletPoint, "star"),
                MarkdownBlock::new(BlockType::Quote, "quoted"),
            ]
        );
    }

    #[test]
    fn task_line_keeps_normalized_marker() {
        assert_eq!(
            classify_line("- [x] Update project timeline"),
            Some(MarkdownBlock::new(
                BlockType::Task,
                "[x] Update project timeline"
            ))
        );
        assert_eq!(
            classify_line("  - [X]   Shout  "),
            Some(MarkdownBlock::new(BlockType::Task, "[x] Shout"))
        );
    }

    #[test]
    fn spans_keep_the_raw_line() {
        assert_eq!(
            classify_line("![Caption](https://example.com/a.png)"),
            Some(MarkdownBlock::new(
                BlockType::Image,
                "![Caption](https://example.com/a.png)"
            ))
        );
        assert_eq!(
            classify_line("[Link Text](https://example.com)"),
            Some(MarkdownBlock::new(
                BlockType::Link,
                "[Link Text](https://example.com)"
            ))
        );
        assert_eq!(
            classify_line("12. Twelfth item"),
            Some(MarkdownBlock::new(BlockType::NumberedPoint, "12. Twelfth item"))
        );
    }

    #[test]
    fn divider_code_and_paragraph() {
        assert_eq!(
            classify_line("---"),
            Some(MarkdownBlock::new(BlockType::Divider, ""))
        );
        assert_eq!(
            classify_line("`cargo run`"),
            Some(MarkdownBlock::new(BlockType::Code, "cargo run"))
        );
        assert_eq!(
            classify_line("``"),
            Some(MarkdownBlock::new(BlockType::Paragraph, "``"))
        );
        assert_eq!(
            classify_line("[not a link]"),
            Some(MarkdownBlock::new(BlockType::Paragraph, "[not a link]"))
        );
        assert_eq!(
            classify_line("1.5 liters"),
            Some(MarkdownBlock::new(BlockType::Paragraph, "1.5 liters"))
        );
        assert_eq!(classify_line("   \t "), None);
    }

    #[test]
    fn fenced_code_is_verbatim() {
        let blocks = parse_markdown("before\n```rust\n# not heading\n  - indented\n\n```\nafter");
        assert_eq!(
            blocks,
            vec![
                MarkdownBlock::new(BlockType::Paragraph, "before"),
                MarkdownBlock::new(BlockType::CodeBlock, "# not heading\n  - indented\n\n"),
                MarkdownBlock::new(BlockType::Paragraph, "after"),
            ]
        );
    }

    #[test]
    fn backticks_inside_a_sentence_do_not_open_a_fence() {
        let blocks = parse_markdown("```let x = 1``` is inline\n# Heading\nafter");
        assert_eq!(
            blocks,
            vec![
                MarkdownBlock::new(BlockType::Paragraph, "```let x = 1``` is inline"),
                MarkdownBlock::new(BlockType::Heading1, "Heading"),
                MarkdownBlock::new(BlockType::Paragraph, "after"),
            ]
        );
        assert_eq!(
            parse_markdown("```rust and more\nplain"),
            vec![
                MarkdownBlock::new(BlockType::Paragraph, "```rust and more"),
                MarkdownBlock::new(BlockType::Paragraph, "plain"),
            ]
        );
    }

    #[test]
    fn only_a_bare_fence_closes_a_block() {
        let blocks = parse_markdown("```\nfirst\n```rust\nsecond\n  ```  \nafter");
        assert_eq!(
            blocks,
            vec![
                MarkdownBlock::new(BlockType::CodeBlock, "first\n```rust\nsecond\n"),
                MarkdownBlock::new(BlockType::Paragraph, "after"),
            ]
        );
    }

    #[test]
    fn unterminated_fence_flushes_by_default() {
        let text = "intro\n```\nlet x = 1;\nlet y = 2;";
        assert_eq!(
            parse_markdown(text),
            vec![
                MarkdownBlock::new(BlockType::Paragraph, "intro"),
                MarkdownBlock::new(BlockType::CodeBlock, "let x = 1;\nlet y = 2;\n"),
            ]
        );
        let dropping = MarkdownOptions {
            flush_unterminated_fence: false,
        };
        assert_eq!(
            parse_markdown_with(text, &dropping),
            vec![MarkdownBlock::new(BlockType::Paragraph, "intro")]
        );
    }

    #[test]
    fn reparsing_reconstructed_block_keeps_type() {
        let prefix_for = |block_type: BlockType| match block_type {
            BlockType::Heading1 => "# ",
            BlockType::Heading2 => "## ",
            BlockType::Heading3 => "### ",
            BlockType::BulletPoint | BlockType::Task => "- ",
            BlockType::Quote => "> ",
            _ => "",
        };
        for block in parse_markdown(SHOWCASE_DOCUMENT) {
            let rebuilt = match block.block_type {
                BlockType::CodeBlock => continue,
                BlockType::Divider => "---".to_string(),
                BlockType::Code => format!("`{}`", block.content),
                other => format!("{}{}", prefix_for(other), block.content),
            };
            let reparsed = classify_line(&rebuilt).expect("non-blank");
            assert_eq!(reparsed.block_type, block.block_type, "line {rebuilt:?}");
        }
    }

    #[test]
    fn showcase_covers_every_block_type() {
        let seen = types(&parse_markdown(SHOWCASE_DOCUMENT));
        for block_type in BlockType::iter() {
            assert!(seen.contains(&block_type), "missing {block_type}");
        }
    }

    #[test]
    fn block_types_use_camel_case_names() -> anyhow::Result<()> {
        assert_eq!(BlockType::BulletPoint.to_string(), "bulletPoint");
        assert_eq!(BlockType::Heading1.as_ref(), "heading1");
        let json = serde_json::to_string(&MarkdownBlock::new(BlockType::CodeBlock, "x"))?;
        assert_eq!(json, r#"{"type":"codeBlock","content":"x"}"#);
        Ok(())
    }
}
