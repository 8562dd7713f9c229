//! Usage: App-level Tauri commands (about info).

use crate::app::shell;

#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct AppAboutInfo {
    os: String,
    arch: String,
    profile: String,
    app_version: String,
    dev_mode: bool,
}

#[tauri::command]
pub(crate) fn app_about_get() -> AppAboutInfo {
    AppAboutInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        profile: if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "release".to_string()
        },
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        dev_mode: shell::current_content_source().is_dev(),
    }
}
