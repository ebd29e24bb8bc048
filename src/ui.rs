// src/ui.rs

pub mod chat;
pub mod desktop;

use crate::app::{App, AppEvent};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    io, thread,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TICK_RATE: Duration = Duration::from_millis(120);

/// Runs the terminal UI until the user quits.
pub async fn run_ui(mut app: App, mut events: UnboundedReceiver<AppEvent>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_input_reader(app.event_sender());
    let res = run_app(&mut terminal, &mut app, &mut events).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        match events.recv().await {
            Some(event) => app.handle_event(event),
            None => break,
        }

        if app.should_quit() {
            info!("Quit requested");
            break;
        }
    }

    Ok(())
}

/// Reads terminal input on its own thread so the event loop never blocks,
/// interleaving a periodic tick for animations.
fn spawn_input_reader(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.send(AppEvent::Input(event)).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => {
                    warn!("Terminal polling failed: {}", e);
                    return;
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });
}

/// Renders the shell with the assistant floating on top.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let clock = Local::now().format("%a %H:%M ").to_string();
    desktop::draw_top_bar(f, chunks[0], &app.desktop, &clock);
    desktop::draw_desktop(f, chunks[1], &app.desktop);
    desktop::draw_footer(f, chunks[2], app.assistant.is_open());
    chat::draw_assistant(f, chunks[1], &mut app.assistant, &app.status);
}
