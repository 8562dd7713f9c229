//! Usage: Resolve per-user app data directory and related path helpers.

use std::path::{Path, PathBuf};

pub const APP_DOTDIR_NAME: &str = ".gmx-desktop";
const APP_DOTDIR_NAME_ENV: &str = "GMX_DESKTOP_DOTDIR_NAME";
const STORAGE_FILE_NAME: &str = "storage.json";
const LOGS_DIR_NAME: &str = "logs";

fn is_safe_dotdir_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if !name.starts_with('.') {
        return false;
    }
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn dotdir_name(override_name: Option<String>) -> String {
    override_name
        .map(|v| v.trim().to_string())
        .filter(|v| is_safe_dotdir_name(v))
        .unwrap_or_else(|| APP_DOTDIR_NAME.to_string())
}

pub fn data_dir_in(home_dir: &Path) -> Result<PathBuf, String> {
    let dir = home_dir.join(dotdir_name(std::env::var(APP_DOTDIR_NAME_ENV).ok()));
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app dir: {e}"))?;
    Ok(dir)
}

pub fn storage_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORAGE_FILE_NAME)
}

pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOGS_DIR_NAME)
}

#[cfg(feature = "desktop")]
pub fn app_data_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    use tauri::Manager;

    let home_dir = app
        .path()
        .home_dir()
        .map_err(|e| format!("failed to resolve home dir: {e}"))?;
    data_dir_in(&home_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotdir_override_must_be_a_plain_dot_name() {
        assert_eq!(dotdir_name(None), APP_DOTDIR_NAME);
        assert_eq!(dotdir_name(Some(" .gmx-dev ".to_string())), ".gmx-dev");
        assert_eq!(dotdir_name(Some("gmx".to_string())), APP_DOTDIR_NAME);
        assert_eq!(dotdir_name(Some("../.gmx".to_string())), APP_DOTDIR_NAME);
        assert_eq!(dotdir_name(Some("..".to_string())), APP_DOTDIR_NAME);
        assert_eq!(dotdir_name(Some(".gmx data".to_string())), APP_DOTDIR_NAME);
    }

    #[test]
    fn storage_and_logs_live_under_data_dir() {
        let data_dir = Path::new("/home/u/.gmx-desktop");
        assert_eq!(storage_path(data_dir), data_dir.join("storage.json"));
        assert_eq!(logs_dir(data_dir), data_dir.join("logs"));
    }
}
