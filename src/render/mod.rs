use std::fmt::Write as _;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::config::Palette;
use crate::markdown::{
    parse_image, parse_link, parse_numbered, parse_task, BlockType, MarkdownBlock,
};

const DIVIDER_WIDTH: usize = 32;

pub fn render_blocks(blocks: &[MarkdownBlock], palette: &Palette) -> Text<'static> {
    let mut lines = Vec::with_capacity(blocks.len());
    for block in blocks {
        render_block(block, palette, &mut lines);
    }
    Text::from(lines)
}

fn render_block(block: &MarkdownBlock, palette: &Palette, lines: &mut Vec<Line<'static>>) {
    let content = block.content.clone();
    match block.block_type {
        BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
            let level = heading_level(block.block_type);
            let mut style = Style::default()
                .fg(palette.heading(level))
                .add_modifier(Modifier::BOLD);
            if level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            lines.push(Line::from(Span::styled(content, style)));
        }
        BlockType::Paragraph => {
            lines.push(Line::from(Span::styled(
                content,
                Style::default().fg(palette.text),
            )));
        }
        BlockType::BulletPoint => {
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(palette.accent)),
                Span::styled(content, Style::default().fg(palette.text)),
            ]));
        }
        BlockType::NumberedPoint => match parse_numbered(&block.content) {
            Some(item) => lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}. ", item.number),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(item.text, Style::default().fg(palette.text)),
            ])),
            None => lines.push(Line::from(content)),
        },
        BlockType::Quote => {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(palette.accent)),
                Span::styled(
                    content,
                    Style::default()
                        .fg(palette.quote)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }
        BlockType::Code => {
            lines.push(Line::from(Span::styled(
                content,
                Style::default().fg(palette.code),
            )));
        }
        BlockType::CodeBlock => {
            let style = Style::default().fg(palette.code);
            for code_line in block.content.lines() {
                lines.push(Line::from(vec![
                    Span::styled("  ", style),
                    Span::styled(code_line.to_string(), style),
                ]));
            }
        }
        BlockType::Image => {
            let image = parse_image(&block.content);
            let label = match image.caption {
                Some(caption) => format!("[image: {caption}]"),
                None => "[image]".to_string(),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        BlockType::Task => {
            let task = parse_task(&block.content);
            let (marker, text_style) = if task.checked {
                (
                    "[x] ",
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", Style::default().fg(palette.text))
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.accent)),
                Span::styled(task.text, text_style),
            ]));
        }
        BlockType::Divider => {
            lines.push(Line::from(Span::styled(
                "─".repeat(DIVIDER_WIDTH),
                Style::default().fg(palette.separator),
            )));
        }
        BlockType::Link => {
            let link = parse_link(&block.content);
            if link.is_empty() {
                lines.push(Line::from(content));
            } else {
                lines.push(Line::from(vec![
                    Span::styled(
                        link.text,
                        Style::default()
                            .fg(palette.link)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::styled(
                        format!(" ({})", link.url),
                        Style::default().fg(palette.muted),
                    ),
                ]));
            }
        }
    }
}

/// Same layout as [`render_blocks`], one line of text per rendered line.
pub fn render_plain(blocks: &[MarkdownBlock]) -> String {
    let text = render_blocks(blocks, &Palette::default());
    let mut out = String::new();
    for line in &text.lines {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}

/// Writes one line per block: the type name padded to 13 columns, a space,
/// then the content with newlines escaped.
pub fn render_outline(blocks: &[MarkdownBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        let _ = writeln!(
            &mut out,
            "{:<13} {}",
            block.block_type.as_ref(),
            block.content.replace('\n', "\\n")
        );
    }
    out
}

fn heading_level(block_type: BlockType) -> usize {
    match block_type {
        BlockType::Heading1 => 1,
        BlockType::Heading2 => 2,
        _ => 3,
    }
}
