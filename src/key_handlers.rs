use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Routes a key press. Global shortcuts come first; then the chat window
/// gets every key while it is open, the desktop otherwise.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.quit(),
            KeyCode::Char('e') => app.assistant.toggle_open(),
            KeyCode::Char('f') if app.assistant.is_open() => app.assistant.toggle_fullscreen(),
            _ => {}
        }
        return;
    }

    if app.assistant.is_open() {
        handle_chat_input(app, key);
    } else {
        handle_desktop_input(app, key);
    }
}

fn handle_chat_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.assistant.close(),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.assistant.pop_input(),
        KeyCode::PageUp => app.assistant.scroll_up(),
        KeyCode::PageDown => app.assistant.scroll_down(),
        KeyCode::Char(c) => app.assistant.push_input(c),
        _ => {}
    }
}

fn handle_desktop_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => app.desktop.select_next(),
        KeyCode::Up | KeyCode::Left | KeyCode::BackTab => app.desktop.select_prev(),
        KeyCode::Enter => app.desktop.open_selected(),
        KeyCode::Esc => app.desktop.close_app(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        app::{
            tests::{ctrl, key, type_text, ScriptedService},
            App,
        },
        assistant::WindowMode,
    };
    use crossterm::event::KeyCode;

    fn app() -> App {
        App::new(ScriptedService::new(vec![]), 500).0
    }

    #[test]
    fn test_ctrl_e_toggles_the_window() {
        let mut app = app();
        app.handle_event(ctrl('e'));
        assert_eq!(app.assistant.window_mode(), WindowMode::Floating);
        app.handle_event(ctrl('e'));
        assert_eq!(app.assistant.window_mode(), WindowMode::Closed);
    }

    #[test]
    fn test_fullscreen_only_when_open() {
        let mut app = app();
        app.handle_event(ctrl('f'));
        assert!(!app.assistant.is_fullscreen());

        app.handle_event(ctrl('e'));
        app.handle_event(ctrl('f'));
        assert_eq!(app.assistant.window_mode(), WindowMode::Fullscreen);

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.assistant.window_mode(), WindowMode::Closed);
        assert!(app.assistant.is_fullscreen());
    }

    #[test]
    fn test_typing_goes_to_the_chat_when_open() {
        let mut app = app();
        app.handle_event(ctrl('e'));
        type_text(&mut app, "quick q");
        app.handle_event(key(KeyCode::Backspace));
        assert_eq!(app.assistant.input(), "quick ");
        assert!(!app.should_quit());
    }

    #[test]
    fn test_desktop_keys_when_closed() {
        let mut app = app();
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.desktop.active_app().map(|a| a.id), Some("notepad"));

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.desktop.active_app(), None);
        assert!(app.assistant.input().is_empty());

        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_from_the_chat() {
        let mut app = app();
        app.handle_event(ctrl('e'));
        app.handle_event(ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_blank_enter_sends_nothing() {
        let mut app = app();
        app.handle_event(ctrl('e'));
        app.handle_event(key(KeyCode::Enter));
        assert!(!app.assistant.is_loading());
        assert_eq!(app.assistant.messages().len(), 1);
    }
}
