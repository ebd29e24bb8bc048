use crate::{
    assistant::{Assistant, WindowMode},
    constants::{
        ICON_HEIGHT, ICON_LABEL, ICON_WIDTH, INPUT_PLACEHOLDER, WINDOW_HEIGHT, WINDOW_TITLE,
        WINDOW_WIDTH,
    },
    markup,
    models::{Message, Sender},
    status_indicator::StatusIndicator,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

const ACCENT: Color = Color::Rgb(80, 200, 120);
const USER_COLOR: Color = Color::Rgb(255, 223, 128);
const AI_COLOR: Color = Color::Rgb(144, 238, 144);

/// Where the floating icon button sits: the bottom-right corner of `area`.
pub fn icon_rect(area: Rect) -> Rect {
    let width = ICON_WIDTH.min(area.width);
    let height = ICON_HEIGHT.min(area.height);
    Rect {
        x: area.right() - width,
        y: area.bottom() - height,
        width,
        height,
    }
}

/// Where the chat window sits for a given mode, if it is visible at all.
pub fn window_rect(area: Rect, mode: WindowMode) -> Option<Rect> {
    match mode {
        WindowMode::Closed => None,
        WindowMode::Fullscreen => Some(area),
        WindowMode::Floating => {
            let icon = icon_rect(area);
            let width = WINDOW_WIDTH.min(area.width);
            let height = WINDOW_HEIGHT.min(icon.y - area.y);
            Some(Rect {
                x: area.right() - width,
                y: icon.y - height,
                width,
                height,
            })
        }
    }
}

/// Draws the icon button and, when open, the chat window over `area`.
pub fn draw_assistant(
    f: &mut Frame,
    area: Rect,
    assistant: &mut Assistant,
    status: &StatusIndicator,
) {
    let mode = assistant.window_mode();
    if mode != WindowMode::Fullscreen {
        draw_icon(f, icon_rect(area), assistant.is_open());
    }
    if let Some(rect) = window_rect(area, mode) {
        if rect.width > 2 && rect.height > 4 {
            draw_window(f, rect, assistant, status);
        }
    }
}

fn draw_icon(f: &mut Frame, area: Rect, open: bool) {
    let style = if open {
        Style::default().fg(Color::Black).bg(ACCENT)
    } else {
        Style::default().fg(ACCENT)
    };
    let button = Paragraph::new(ICON_LABEL)
        .alignment(Alignment::Center)
        .style(style.add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        );

    f.render_widget(Clear, area);
    f.render_widget(button, area);
}

fn draw_window(f: &mut Frame, area: Rect, assistant: &mut Assistant, status: &StatusIndicator) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(Line::from(vec![
            Span::raw(" "),
            status.span(),
            Span::styled(
                format!(" {} ", WINDOW_TITLE),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]))
        .title(
            Line::from(Span::styled(
                format!(" ^F {} · Esc × ", assistant.fullscreen_hint()),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_messages(f, assistant, chunks[0]);

    let separator = "─".repeat(chunks[1].width as usize);
    f.render_widget(
        Paragraph::new(Span::styled(separator, Style::default().fg(Color::DarkGray))),
        chunks[1],
    );

    draw_input(f, assistant, chunks[2]);
}

fn draw_messages(f: &mut Frame, assistant: &mut Assistant, area: Rect) {
    let lines = message_lines(assistant.messages(), assistant.is_loading(), area.width);

    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total_lines.saturating_sub(area.height);
    assistant.clamp_scroll(max_scroll);
    let scroll = max_scroll - assistant.scroll_back();

    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

/// Flattens the conversation into display lines wrapped to `width`.
pub fn message_lines(messages: &[Message], loading: bool, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let last = messages.len().saturating_sub(1);

    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (indent, author, mut style) = match message.sender {
            Sender::User => ("  ", "You", Style::default().fg(USER_COLOR)),
            Sender::Ai => ("", "Emeraude", Style::default().fg(AI_COLOR)),
        };
        if markup::is_error_notice(&message.content) {
            style = Style::default().fg(Color::Red);
        }

        lines.push(Line::from(vec![
            Span::styled(indent, style),
            Span::styled("┌─ ", style),
            Span::styled(author, style.add_modifier(Modifier::BOLD)),
        ]));

        let mut body = markup::to_lines(&message.content);
        if body.is_empty() && loading && idx == last {
            body.push("…".to_string());
            style = style.add_modifier(Modifier::DIM);
        }

        let wrap_width = (width as usize).saturating_sub(indent.len() + 2).max(1);
        for text_line in &body {
            for wrapped in wrap(text_line, wrap_width) {
                lines.push(Line::from(vec![
                    Span::styled(indent, style),
                    Span::styled("│ ", style),
                    Span::styled(wrapped.into_owned(), style),
                ]));
            }
        }
    }

    lines
}

fn draw_input(f: &mut Frame, assistant: &Assistant, area: Rect) {
    let label = assistant.send_label();
    let label_width = u16::try_from(label.width()).unwrap_or(1) + 2;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(label_width)])
        .split(area);

    let loading = assistant.is_loading();
    let prompt_style = Style::default().fg(if loading { Color::DarkGray } else { ACCENT });
    let visible_width = (chunks[0].width as usize).saturating_sub(2);
    let shown = tail_within(assistant.input(), visible_width);

    let text = if assistant.input().is_empty() {
        Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if loading {
        Span::styled(shown.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(shown.to_string(), Style::default().fg(Color::White))
    };

    f.render_widget(
        Paragraph::new(Line::from(vec![Span::styled("→ ", prompt_style), text])),
        chunks[0],
    );

    let label_style = if loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(Span::styled(label, label_style)).alignment(Alignment::Center),
        chunks[1],
    );

    if !loading {
        let cursor_x = chunks[0].x + 2 + u16::try_from(shown.width()).unwrap_or(0);
        f.set_cursor_position((cursor_x.min(chunks[0].right().saturating_sub(1)), chunks[0].y));
    }
}

/// The longest suffix of `text` that fits in `width` columns.
fn tail_within(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}
