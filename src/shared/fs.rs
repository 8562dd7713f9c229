//! Usage: Small filesystem helpers for persisted state (atomic writes, optional reads).

use std::path::Path;

pub(crate) fn read_optional_to_string(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))
}

pub(crate) fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create dir {}: {e}", parent.display()))?;
    }

    let file_name = path.file_name().and_then(|v| v.to_str()).unwrap_or("file");
    let tmp_path = path.with_file_name(format!("{file_name}.gmx-tmp"));

    std::fs::write(&tmp_path, bytes)
        .map_err(|e| format!("failed to write temp file {}: {e}", tmp_path.display()))?;

    // Windows rename requires target not to exist.
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    std::fs::rename(&tmp_path, path)
        .map_err(|e| format!("failed to finalize file {}: {e}", path.display()))?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::unique_tmp_dir;
    use super::*;

    #[test]
    fn unique_tmp_dir_is_unique_across_calls() {
        let a = unique_tmp_dir("fs");
        let b = unique_tmp_dir("fs");
        assert_ne!(a, b);
        let _ = std::fs::remove_dir_all(&a);
        let _ = std::fs::remove_dir_all(&b);
    }

    #[test]
    fn read_optional_to_string_missing_is_none() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("missing.json");
        let out = read_optional_to_string(&path).expect("read_optional_to_string");
        assert!(out.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_file_atomic_creates_parent_and_replaces_contents() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("a").join("b").join("storage.json");
        write_file_atomic(&path, b"{\"v\":\"1\"}").expect("first write");
        write_file_atomic(&path, b"{\"v\":\"2\"}").expect("second write");

        let got = read_optional_to_string(&path)
            .expect("read_optional_to_string")
            .expect("file exists");
        assert_eq!(got, "{\"v\":\"2\"}");
        assert!(!dir.join("a").join("b").join("storage.json.gmx-tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
