//! State of the floating Emeraude chat widget.
//!
//! The widget is either closed, floating in the corner, or covering the
//! whole screen. The conversation is append-only and lives for as long as
//! the process does. While a request is outstanding the last message is
//! the AI reply being streamed in, and input is disabled.

use crate::{
    constants::{ERROR_NOTICE_HTML, GREETING_HTML, SEND_LABEL, SEND_LABEL_LOADING},
    context::{screen_context, ScreenSnapshot},
    markup,
    models::{Message, Sender},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Closed,
    Floating,
    Fullscreen,
}

/// A query ready to be sent to the assistant service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub screen_context: String,
    pub text: String,
}

#[derive(Debug)]
pub struct Assistant {
    is_open: bool,
    is_fullscreen: bool,
    messages: Vec<Message>,
    input: String,
    is_loading: bool,
    context_chars: usize,
    /// Lines scrolled back from the bottom of the chat body.
    scroll_back: u16,
}

impl Assistant {
    pub fn new(context_chars: usize) -> Self {
        Self {
            is_open: false,
            is_fullscreen: false,
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            context_chars,
            scroll_back: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    pub fn window_mode(&self) -> WindowMode {
        match (self.is_open, self.is_fullscreen) {
            (false, _) => WindowMode::Closed,
            (true, false) => WindowMode::Floating,
            (true, true) => WindowMode::Fullscreen,
        }
    }

    pub fn send_label(&self) -> &'static str {
        if self.is_loading {
            SEND_LABEL_LOADING
        } else {
            SEND_LABEL
        }
    }

    pub fn fullscreen_hint(&self) -> &'static str {
        if self.is_fullscreen {
            "Exit Fullscreen"
        } else {
            "Fullscreen"
        }
    }

    /// The floating icon button. Closing this way also leaves fullscreen.
    pub fn toggle_open(&mut self) {
        if self.is_open && self.is_fullscreen {
            self.is_fullscreen = false;
        }
        self.set_open(!self.is_open);
    }

    /// The window's own close control; fullscreen is remembered.
    pub fn close(&mut self) {
        self.set_open(false);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.is_fullscreen = !self.is_fullscreen;
    }

    fn set_open(&mut self, open: bool) {
        self.is_open = open;
        if self.is_open && self.messages.is_empty() {
            self.push_message(Message::ai(GREETING_HTML));
        }
    }

    pub fn push_input(&mut self, c: char) {
        if !self.is_loading {
            self.input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if !self.is_loading {
            self.input.pop();
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_back = self.scroll_back.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }

    /// Caps scroll-back at the top of the rendered body.
    pub fn clamp_scroll(&mut self, max_scroll: u16) {
        self.scroll_back = self.scroll_back.min(max_scroll);
    }

    /// Starts a request from the current input. Returns `None` when there
    /// is nothing to send or a request is already in flight.
    pub fn begin_send(&mut self, screen: &ScreenSnapshot<'_>) -> Option<PendingQuery> {
        if self.input.trim().is_empty() || self.is_loading {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.push_message(Message::user(format!("<p>{}</p>", markup::escape(&text))));
        self.is_loading = true;

        let screen_context = screen_context(screen, self.context_chars);
        self.push_message(Message::ai(String::new()));

        Some(PendingQuery {
            screen_context,
            text,
        })
    }

    /// Appends a streamed chunk to the reply being filled.
    pub fn append_chunk(&mut self, chunk: &str) {
        if !self.is_loading {
            return;
        }
        if let Some(last) = self.streaming_reply() {
            last.content.push_str(chunk);
            self.scroll_back = 0;
        }
    }

    /// Replaces the reply being filled with the generic error notice.
    pub fn fail(&mut self) {
        if let Some(last) = self.streaming_reply() {
            last.content = ERROR_NOTICE_HTML.to_string();
            self.scroll_back = 0;
        }
    }

    pub fn finish(&mut self) {
        self.is_loading = false;
    }

    fn streaming_reply(&mut self) -> Option<&mut Message> {
        self.messages
            .last_mut()
            .filter(|message| message.sender == Sender::Ai)
    }

    fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_back = 0;
    }
}
