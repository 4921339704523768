//! ImageTriage - sort a folder of images into subfolders, one key per image
//!
//! Main entry point.

mod app;

use anyhow::Result;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("ImageTriage starting...");

    let config = app_core::AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default configuration: {}", e);
        app_core::AppConfig::default()
    });

    // First run: write the defaults out
    if !app_core::AppConfig::config_path().exists() {
        if let Err(e) = config.save() {
            tracing::warn!("Failed to write default configuration: {}", e);
        }
    }

    let mut session = app_core::Session::with_defaults(config);

    if let Some(folder) = std::env::args_os().nth(1).map(PathBuf::from) {
        if let Err(e) = session.on_open_folder(&folder) {
            eprintln!("{}", e.user_message());
        }
    }

    app::run(session)
}
