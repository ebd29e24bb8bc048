use crate::{desktop::Desktop, markup};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_desktop(f: &mut Frame<'_>, area: Rect, desktop: &Desktop) {
    let background = Block::default().style(Style::default().bg(Color::Rgb(16, 32, 28)));
    f.render_widget(background, area);

    match desktop.active_app() {
        Some(app) => {
            let window = centered(area, 80, 80);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(format!(" {} {} ", app.icon, app.name))
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .style(Style::default().fg(Color::White).bg(Color::Black));

            let lines: Vec<Line> = markup::to_lines(app.content)
                .into_iter()
                .map(Line::from)
                .collect();
            let content = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true });

            f.render_widget(content, window);
        }
        None => {
            let items: Vec<ListItem> = desktop
                .apps()
                .iter()
                .enumerate()
                .map(|(i, app)| {
                    let label = format!("{}  {}", app.icon, app.name);
                    if i == desktop.selected() {
                        ListItem::new(label).style(
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::LightGreen)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        ListItem::new(label).style(Style::default().fg(Color::White))
                    }
                })
                .collect();

            let list_area = Layout::default()
                .direction(Direction::Vertical)
                .margin(2)
                .constraints([Constraint::Min(1)])
                .split(area)[0];

            f.render_widget(List::new(items), list_area);
        }
    }
}

pub fn draw_top_bar(f: &mut Frame<'_>, area: Rect, desktop: &Desktop, clock: &str) {
    let location = desktop.active_app().map_or("Desktop", |app| app.name);
    let bar = Line::from(vec![
        Span::styled(
            " Emeraude OS ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(location, Style::default().fg(Color::White)),
    ]);
    f.render_widget(
        Paragraph::new(bar).style(Style::default().bg(Color::Black)),
        area,
    );
    f.render_widget(
        Paragraph::new(Span::styled(clock, Style::default().fg(Color::Gray)))
            .alignment(ratatui::layout::Alignment::Right),
        area,
    );
}

/// Key hints for whatever currently has focus.
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, assistant_open: bool) {
    let instructions = if assistant_open {
        "Enter send · ^F fullscreen · Esc close · PgUp/PgDn scroll · ^E hide · ^C quit"
    } else {
        "↑/↓ select · Enter open · Esc close app · ^E Emeraude · q quit"
    };

    f.render_widget(
        Paragraph::new(instructions).style(Style::default().fg(Color::DarkGray).bg(Color::Black)),
        area,
    );
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_APPS;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(desktop: &Desktop) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_desktop(f, area, desktop);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..20)
            .map(|y| (0..60).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_home_lists_every_app() {
        let desktop = Desktop::new(DEFAULT_APPS);
        let screen = render(&desktop);
        for app in DEFAULT_APPS {
            assert!(screen.contains(app.name), "missing {}", app.name);
        }
    }

    #[test]
    fn test_open_app_shows_its_content() {
        let mut desktop = Desktop::new(DEFAULT_APPS);
        desktop.select_next();
        desktop.open_selected();
        let screen = render(&desktop);
        assert!(screen.contains("Notepad"));
        assert!(screen.contains("Day 1: arrive"));
        assert!(!screen.contains("Calculator"));
    }
}
