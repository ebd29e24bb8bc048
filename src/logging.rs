// src/logging.rs

use crate::{config::Config, errors::EmeraudeResult, models::ApiCallLog};
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};
use log::info;

/// Starts the file logger. The terminal belongs to the UI, so nothing is
/// written to stderr. `RUST_LOG` overrides the configured level.
///
/// The returned handle must be kept alive for the lifetime of the program.
pub fn init_logging(config: &Config) -> EmeraudeResult<LoggerHandle> {
    std::fs::create_dir_all(&config.log_dir)?;

    let handle = Logger::try_with_env_or_str(&config.log_level)?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.clone())
                .basename("emeraude"),
        )
        .format(detailed_format)
        .start()?;

    Ok(handle)
}

pub fn format_api_call(log: &ApiCallLog) -> String {
    format!(
        "[{}] {} - {} - Status: {} - Time: {}ms - Chunks: {}",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms,
        log.chunks
    )
}

/// Records one streaming API call.
pub fn log_api_call(log: &ApiCallLog) {
    info!(target: "emeraude::api", "{}", format_api_call(log));
}
