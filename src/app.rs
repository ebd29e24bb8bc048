use crate::{
    api::AssistantService,
    assistant::{Assistant, PendingQuery},
    constants::DEFAULT_APPS,
    desktop::Desktop,
    key_handlers::handle_key,
    status_indicator::StatusIndicator,
};
use crossterm::event::{Event, KeyEventKind};
use futures::StreamExt;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    Tick,
    Chunk(String),
    Failed,
    Finished,
}

pub struct App {
    pub desktop: Desktop,
    pub assistant: Assistant,
    pub status: StatusIndicator,
    service: Arc<dyn AssistantService>,
    events: UnboundedSender<AppEvent>,
    should_quit: bool,
}

impl App {
    /// Builds the app and the channel its event loop drains.
    pub fn new(
        service: Arc<dyn AssistantService>,
        context_chars: usize,
    ) -> (App, UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let app = App {
            desktop: Desktop::new(DEFAULT_APPS),
            assistant: Assistant::new(context_chars),
            status: StatusIndicator::new(),
            service,
            events,
            should_quit: false,
        };
        (app, rx)
    }

    pub fn event_sender(&self) -> UnboundedSender<AppEvent> {
        self.events.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                handle_key(self, key);
            }
            AppEvent::Input(_) => {}
            AppEvent::Tick => self.status.update_spinner(),
            AppEvent::Chunk(chunk) => self.assistant.append_chunk(&chunk),
            AppEvent::Failed => self.assistant.fail(),
            AppEvent::Finished => {
                self.assistant.finish();
                self.status.set_thinking(false);
            }
        }
    }

    /// Sends the current input, if any, with a description of the screen.
    pub fn submit(&mut self) {
        let Some(query) = self.assistant.begin_send(&self.desktop.snapshot()) else {
            return;
        };

        info!(
            "Sending query ({} chars) from '{}'",
            query.text.chars().count(),
            self.desktop.active_app().map_or("Desktop", |app| app.name)
        );
        self.status.set_thinking(true);
        tokio::spawn(stream_reply(
            Arc::clone(&self.service),
            query,
            self.events.clone(),
        ));
    }
}

/// Consumes one reply stream, forwarding chunks to the event loop. Always
/// ends with `AppEvent::Finished`, after `AppEvent::Failed` on error.
pub async fn stream_reply(
    service: Arc<dyn AssistantService>,
    query: PendingQuery,
    events: UnboundedSender<AppEvent>,
) {
    let mut stream = service.stream_response(&query.screen_context, &query.text);

    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                if events.send(AppEvent::Chunk(chunk)).is_err() {
                    return;
                }
            }
            Err(e) => {
                error!("Streaming reply failed: {}", e);
                let _ = events.send(AppEvent::Failed);
                break;
            }
        }
    }

    let _ = events.send(AppEvent::Finished);
}
