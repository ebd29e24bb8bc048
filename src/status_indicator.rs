use ratatui::{
    style::{Color, Style},
    text::Span,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Spinner shown in the chat header while a reply is streaming.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    thinking: bool,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
        if !thinking {
            self.spinner_idx = 0;
        }
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Advances the animation; called on every tick.
    pub fn update_spinner(&mut self) {
        if self.thinking {
            self.spinner_idx = self.spinner_idx.wrapping_add(1);
        }
    }

    pub fn span(&self) -> Span<'static> {
        if self.thinking {
            Span::styled(
                SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()],
                Style::default().fg(Color::LightGreen),
            )
        } else {
            Span::raw(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_only_moves_while_thinking() {
        let mut status = StatusIndicator::new();
        status.update_spinner();
        assert_eq!(status.span().content, " ");

        status.set_thinking(true);
        assert_eq!(status.span().content, "◐");
        status.update_spinner();
        assert_eq!(status.span().content, "◓");

        status.set_thinking(false);
        assert!(!status.is_thinking());
        assert_eq!(status.span().content, " ");
    }
}
