//! Usage: Application shell (main window creation, dev/packaged content source, lifecycle policy).

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "GMX";
pub const MAIN_WINDOW_WIDTH: f64 = 1200.0;
pub const MAIN_WINDOW_HEIGHT: f64 = 800.0;

pub const DEV_MODE_ENV: &str = "GMX_DESKTOP_ENV";
pub const DEV_SERVER_URL: &str = "http://localhost:5173";
/// Relative to the bundled `dist/` directory.
pub const PACKAGED_ENTRY: &str = "index.html";

const BACKGROUND_RESIDENT_OS: &str = "macos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    DevServer(&'static str),
    Packaged(&'static str),
}

impl ContentSource {
    pub fn is_dev(&self) -> bool {
        matches!(self, ContentSource::DevServer(_))
    }

    pub fn opens_devtools(&self) -> bool {
        self.is_dev()
    }
}

fn is_development_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("development"))
}

pub fn select_content_source(env_flag: Option<&str>, is_packaged: bool) -> ContentSource {
    if is_development_flag(env_flag) || !is_packaged {
        return ContentSource::DevServer(DEV_SERVER_URL);
    }
    ContentSource::Packaged(PACKAGED_ENTRY)
}

pub fn quits_when_all_windows_closed(os: &str) -> bool {
    os != BACKGROUND_RESIDENT_OS
}

pub fn should_create_window_on_activate(open_windows: usize) -> bool {
    open_windows == 0
}

#[cfg(feature = "desktop")]
pub fn current_content_source() -> ContentSource {
    let env_flag = std::env::var(DEV_MODE_ENV).ok();
    select_content_source(env_flag.as_deref(), !tauri::is_dev())
}

#[cfg(feature = "desktop")]
pub fn create_main_window(app: &tauri::AppHandle) -> Result<(), String> {
    let source = current_content_source();
    let url = match &source {
        ContentSource::DevServer(url) => tauri::WebviewUrl::External(
            url.parse()
                .map_err(|e| format!("invalid dev server url={url}: {e}"))?,
        ),
        ContentSource::Packaged(entry) => tauri::WebviewUrl::App(std::path::PathBuf::from(entry)),
    };

    let window = tauri::WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, url)
        .title(MAIN_WINDOW_TITLE)
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .build()
        .map_err(|e| format!("failed to create main window: {e}"))?;

    if source.opens_devtools() {
        window.open_devtools();
    }

    tracing::info!(source = ?source, "主窗口已创建");
    Ok(())
}

#[cfg(feature = "desktop")]
pub fn show_main_window(app: &tauri::AppHandle) {
    use tauri::Manager;

    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let _ = window.show();
    let _ = window.unminimize();
    let _ = window.set_focus();
}

/// Reactivation with no window open recreates it; otherwise the existing one is focused.
#[cfg(feature = "desktop")]
pub fn on_activate(app: &tauri::AppHandle) {
    use tauri::Manager;

    if !should_create_window_on_activate(app.webview_windows().len()) {
        show_main_window(app);
        return;
    }

    if let Err(err) = create_main_window(app) {
        tracing::error!("重新创建主窗口失败: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_flag_selects_dev_server_even_when_packaged() {
        for flag in ["development", " Development ", "DEVELOPMENT"] {
            assert_eq!(
                select_content_source(Some(flag), true),
                ContentSource::DevServer("http://localhost:5173"),
                "flag={flag}"
            );
        }
    }

    #[test]
    fn unpackaged_build_uses_dev_server_and_devtools() {
        let source = select_content_source(None, false);
        assert_eq!(source, ContentSource::DevServer(DEV_SERVER_URL));
        assert!(source.opens_devtools());

        let source = select_content_source(Some("production"), false);
        assert!(source.is_dev());
    }

    #[test]
    fn packaged_build_loads_bundled_entry_without_devtools() {
        for flag in [None, Some("production"), Some("")] {
            let source = select_content_source(flag, true);
            assert_eq!(source, ContentSource::Packaged("index.html"));
            assert!(!source.opens_devtools());
        }
    }

    #[test]
    fn only_macos_keeps_running_without_windows() {
        assert!(!quits_when_all_windows_closed("macos"));
        assert!(quits_when_all_windows_closed("windows"));
        assert!(quits_when_all_windows_closed("linux"));
    }

    #[test]
    fn activate_creates_window_only_when_none_open() {
        assert!(should_create_window_on_activate(0));
        assert!(!should_create_window_on_activate(1));
    }
}
