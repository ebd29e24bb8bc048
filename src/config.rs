use crate::{
    constants::{API_KEY_ENV, DEFAULT_CONTEXT_CHARS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_API_URL},
    errors::{EmeraudeError, EmeraudeResult},
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// How many characters of on-screen text go into the screen context.
    pub context_char_limit: usize,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            context_char_limit: DEFAULT_CONTEXT_CHARS,
            log_level: "info".to_string(),
            log_dir: config_dir()
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|_| PathBuf::from("logs")),
        }
    }
}

/// Loads `~/.config/emeraude/config.json`, writing a default one first if
/// it does not exist. `GEMINI_API_KEY` wins over the stored key.
pub fn initialize_config() -> EmeraudeResult<Config> {
    let mut config = load_config_from(&get_config_path()?)?;

    if let Ok(key) = env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api_key = key;
        }
    }

    validate_config(&config)?;
    Ok(config)
}

/// Reads the config at `path`. A missing file is created with defaults.
pub fn load_config_from(path: &Path) -> EmeraudeResult<Config> {
    if path.exists() {
        let config_str = fs::read_to_string(path).map_err(|e| {
            EmeraudeError::config_error(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&config_str)
            .map_err(|e| EmeraudeError::config_error(format!("Failed to parse config: {}", e)))
    } else {
        let config = Config::default();
        save_config_to(path, &config)?;
        Ok(config)
    }
}

pub fn save_config_to(path: &Path, config: &Config) -> EmeraudeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            EmeraudeError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| EmeraudeError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| EmeraudeError::config_error(format!("Failed to write config file: {}", e)))
}

fn config_dir() -> EmeraudeResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| EmeraudeError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("emeraude"))
}

pub fn get_config_path() -> EmeraudeResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn validate_config(config: &Config) -> EmeraudeResult<()> {
    if config.api_key.trim().is_empty() {
        return Err(EmeraudeError::config_error(format!(
            "API key is required: set {} or add it to the config file",
            API_KEY_ENV
        )));
    }

    if config.model.trim().is_empty() {
        return Err(EmeraudeError::config_error("Model name is required"));
    }

    match Url::parse(&config.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(EmeraudeError::config_error(format!(
                "base_url must be an http(s) URL, got '{}'",
                config.base_url
            )))
        }
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(EmeraudeError::config_error(
            "Temperature must be between 0.0 and 2.0",
        ));
    }

    if config.context_char_limit == 0 {
        return Err(EmeraudeError::config_error(
            "context_char_limit must be greater than 0",
        ));
    }

    Ok(())
}
