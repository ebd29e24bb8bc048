// src/desktop.rs

use crate::{context::ScreenSnapshot, markup, models::AppDefinition};

/// The shell the assistant floats over: a row of app icons and at most one
/// open app window.
#[derive(Debug)]
pub struct Desktop {
    apps: &'static [AppDefinition],
    selected: usize,
    active: Option<usize>,
    /// Markup describing the icon grid, shown when no app is open.
    home_markup: String,
}

impl Desktop {
    pub fn new(apps: &'static [AppDefinition]) -> Self {
        let icons: String = apps
            .iter()
            .map(|app| format!("<li>{} {}</li>", app.icon, markup::escape(app.name)))
            .collect();

        Self {
            apps,
            selected: 0,
            active: None,
            home_markup: format!("<ul>{}</ul>", icons),
        }
    }

    pub fn apps(&self) -> &'static [AppDefinition] {
        self.apps
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.apps.is_empty() {
            self.selected = (self.selected + 1) % self.apps.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.apps.is_empty() {
            self.selected = (self.selected + self.apps.len() - 1) % self.apps.len();
        }
    }

    pub fn open_selected(&mut self) {
        if self.selected < self.apps.len() {
            self.active = Some(self.selected);
        }
    }

    pub fn close_app(&mut self) {
        self.active = None;
    }

    pub fn active_app(&self) -> Option<&'static AppDefinition> {
        let apps = self.apps;
        self.active.map(|idx| &apps[idx])
    }

    /// Markup of whatever currently fills the screen.
    pub fn screen_markup(&self) -> &str {
        match self.active_app() {
            Some(app) => app.content,
            None => &self.home_markup,
        }
    }

    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        ScreenSnapshot {
            active_app: self.active_app(),
            markup: self.screen_markup(),
        }
    }
}
