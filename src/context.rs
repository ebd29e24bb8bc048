// src/context.rs

use crate::{constants::DESKTOP_NAME, markup, models::AppDefinition};

/// What is on screen when the user sends a message.
#[derive(Debug, Clone, Copy)]
pub struct ScreenSnapshot<'a> {
    pub active_app: Option<&'a AppDefinition>,
    pub markup: &'a str,
}

/// Describes the active app and the beginning of its visible text.
pub fn screen_context(snapshot: &ScreenSnapshot<'_>, limit: usize) -> String {
    let app_name = snapshot.active_app.map_or(DESKTOP_NAME, |app| app.name);
    let text = markup::text_content(snapshot.markup);
    let excerpt: String = text.trim().chars().take(limit).collect();

    format!(
        "The user is currently in the '{app_name}' app. The first {limit} characters of text on the screen are: \"{excerpt}...\""
    )
}
