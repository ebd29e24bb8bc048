use crate::models::AppDefinition;

// Assistant copy
pub const WINDOW_TITLE: &str = "Emeraude AI";
pub const GREETING_HTML: &str = "<p>Hello! I am Emeraude. How can I assist you today?</p>";
pub const ERROR_NOTICE_HTML: &str = "<p class=\"text-red-500\">An error occurred.</p>";
pub const INPUT_PLACEHOLDER: &str = "Ask Emeraude...";
pub const SEND_LABEL: &str = "➤";
pub const SEND_LABEL_LOADING: &str = "...";
pub const ICON_LABEL: &str = "💎 Emeraude";
pub const DESKTOP_NAME: &str = "Desktop";

// Floating window geometry, in terminal cells
pub const WINDOW_WIDTH: u16 = 52;
pub const WINDOW_HEIGHT: u16 = 22;
pub const ICON_WIDTH: u16 = 15;
pub const ICON_HEIGHT: u16 = 3;

// API Constants
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_CONTEXT_CHARS: usize = 500;
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const SYSTEM_INSTRUCTION: &str = "You are Emeraude, a friendly assistant built into a desktop \
operating system. You receive a short description of what the user is looking at followed by \
their question. Answer concisely and helpfully. Format every answer as a small HTML fragment \
using only <p>, <ul>, <li>, <strong>, <em> and <code> tags. Never wrap the answer in markdown \
code fences and never include <html>, <head> or <body> tags.";

pub const DEFAULT_APPS: &[AppDefinition] = &[
    AppDefinition {
        id: "documents",
        name: "Documents",
        icon: "📁",
        content: "<h2>Documents</h2>\
<ul><li>Quarterly report.odt</li><li>Travel plans.txt</li><li>Recipes &amp; notes.md</li></ul>\
<p>3 items, 148 KB used.</p>",
    },
    AppDefinition {
        id: "notepad",
        name: "Notepad",
        icon: "📝",
        content: "<h2>Travel plans.txt</h2>\
<p>Day 1: arrive in Lisbon, check in near Alfama.</p>\
<p>Day 2: tram 28, Belém tower, pastéis de nata.</p>\
<p>Day 3: day trip to Sintra, back by 19:00.</p>",
    },
    AppDefinition {
        id: "web_browser",
        name: "Web Browser",
        icon: "🌐",
        content: "<h2>Rust Programming Language</h2>\
<p>A language empowering everyone to build reliable and efficient software.</p>\
<ul><li>Performance</li><li>Reliability</li><li>Productivity</li></ul>",
    },
    AppDefinition {
        id: "calculator",
        name: "Calculator",
        icon: "🧮",
        content: "<p>Display: 1,024 &times; 3 = 3,072</p><p>History: 12 + 30 = 42</p>",
    },
    AppDefinition {
        id: "settings",
        name: "Settings",
        icon: "⚙️",
        content: "<h2>Settings</h2>\
<ul><li>Theme: Emerald dark</li><li>Wallpaper: Aurora</li><li>Language: English</li>\
<li>Notifications: on</li></ul>",
    },
];
