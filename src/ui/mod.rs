use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, FocusPane};
use crate::config::Palette;
use crate::highlight::split_highlighted;
use crate::notes::{DisplayItem, Note};
use crate::render::render_blocks;

const HIGHLIGHT_SYMBOL: &str = "▸ ";

pub fn draw_app(
    frame: &mut Frame,
    state: &AppState,
    list_state: &mut ListState,
    palette: &Palette,
    show_icons: bool,
) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(vertical[0]);

    draw_list(frame, columns[0], state, list_state, palette, show_icons);
    draw_reader(frame, columns[1], state, palette);

    let status = Paragraph::new(build_status_line(state, palette))
        .style(Style::default().fg(palette.muted));
    frame.render_widget(status, vertical[1]);
}

fn pane_block(title: &str, focused: bool, palette: &Palette) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    list_state: &mut ListState,
    palette: &Palette,
    show_icons: bool,
) {
    let block = pane_block("Notes", matches!(state.focus, FocusPane::List), palette);
    let inner_width = area
        .width
        .saturating_sub(2 + HIGHLIGHT_SYMBOL.width() as u16) as usize;

    let items: Vec<ListItem> = if !state.has_notes() {
        vec![ListItem::new(Line::from(Span::styled(
            "No notes yet.",
            Style::default().fg(palette.muted),
        )))]
    } else if state.is_no_results() {
        vec![ListItem::new(Line::from(Span::styled(
            format!("No results for \"{}\"", state.search_query()),
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        )))]
    } else {
        state
            .visible_items()
            .iter()
            .map(|item| match item {
                DisplayItem::Separator { label } => ListItem::new(Line::from(Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(palette.separator)
                        .add_modifier(Modifier::BOLD),
                ))),
                DisplayItem::Note(note) => ListItem::new(note_row(
                    note,
                    state.search_query(),
                    inner_width,
                    palette,
                    show_icons,
                )),
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(palette.selection_bg)
                .fg(palette.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL);
    frame.render_stateful_widget(list, area, list_state);
}

fn note_row(
    note: &Note,
    query: &str,
    width: usize,
    palette: &Palette,
    show_icons: bool,
) -> Line<'static> {
    let mut spans = Vec::new();
    let mut used = 0;
    if show_icons {
        let glyph = icon_glyph(note);
        used += glyph.width();
        spans.push(Span::styled(glyph, Style::default().fg(palette.accent)));
    }
    let highlight_style = Style::default()
        .fg(palette.highlight)
        .add_modifier(Modifier::BOLD);
    for (segment, highlighted) in split_highlighted(&note.title, query) {
        used += segment.width();
        let style = if highlighted {
            highlight_style
        } else {
            Style::default().fg(palette.text)
        };
        spans.push(Span::styled(segment.to_string(), style));
    }
    let time_width = note.display_time.width();
    let padding = width.saturating_sub(used + time_width).max(1);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(
        note.display_time.clone(),
        Style::default().fg(palette.muted),
    ));
    Line::from(spans)
}

fn icon_glyph(note: &Note) -> &'static str {
    if note.is_custom_icon {
        return "◆ ";
    }
    match note.icon_ref.as_str() {
        "waveform" | "mic" => "♪ ",
        "book" => "▤ ",
        "cart" => "▣ ",
        _ => "● ",
    }
}

fn draw_reader(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let block = pane_block("Reader", matches!(state.focus, FocusPane::Reader), palette);
    let text = match state.selected_note() {
        Some(note) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    note.title.clone(),
                    Style::default()
                        .fg(palette.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} at {}", note.timestamp.date(), note.display_time),
                    Style::default().fg(palette.muted),
                )),
                Line::from(""),
            ];
            lines.extend(render_blocks(state.document(), palette).lines);
            Text::from(lines)
        }
        None => Text::from("Select a note to read it."),
    };
    let reader = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.reader_scroll, 0));
    frame.render_widget(Clear, area);
    frame.render_widget(reader, area);
}

fn build_status_line(state: &AppState, palette: &Palette) -> Text<'static> {
    let (rank, total) = state.selection_position();
    let focus = match state.focus {
        FocusPane::List => "List",
        FocusPane::Reader => "Reader",
    };
    let mut spans = vec![
        Span::raw(format!("Note {rank}/{total}")),
        Span::raw(" | Focus: "),
        Span::styled(focus, Style::default().add_modifier(Modifier::BOLD)),
    ];

    if state.is_search_active() || !state.search_query().is_empty() {
        let label_style = if state.is_search_active() {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::raw(" | Search "));
        spans.push(Span::styled("/", label_style));
        if state.search_query().is_empty() {
            spans.push(Span::styled(
                "(type to search)",
                Style::default().fg(palette.separator),
            ));
        } else {
            spans.push(Span::styled(
                state.search_query().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if state.is_search_active() {
            spans.push(Span::styled(" ▌", Style::default().fg(palette.accent)));
        }
    }

    if state.rejected_count() > 0 {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} skipped", state.rejected_count()),
            Style::default().fg(palette.highlight),
        ));
    }

    let mut lines = vec![Line::from(spans)];
    let hint = state
        .status_message()
        .map(str::to_string)
        .unwrap_or_else(|| "j/k move • / search • Tab switch pane • q quit".to_string());
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(palette.muted),
    )));
    Text::from(lines)
}
