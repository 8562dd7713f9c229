//! Usage: Explicitly constructed application services handed to Tauri via `manage`.

use crate::domain::session::SessionStore;
use crate::infra::api_client::ApiClient;
use crate::infra::kv_store::{JsonFileStore, KvStore, MemoryStore};
use crate::notice::Notifier;
use std::path::Path;
use std::sync::Arc;

pub struct AppState {
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    /// Wires storage → HTTP client → session → notifier, in that order.
    pub fn init(store: Arc<dyn KvStore>) -> Result<Self, String> {
        let api = Arc::new(ApiClient::new(Arc::clone(&store)).map_err(|e| e.to_string())?);
        let session =
            Arc::new(SessionStore::load(store, Arc::clone(&api)).map_err(|e| e.to_string())?);

        Ok(Self {
            api,
            session,
            notifier: Arc::new(Notifier::new()),
        })
    }
}

/// Falls back to a non-persistent store so the app still starts when the file is unusable.
pub fn open_store(storage_path: &Path) -> Arc<dyn KvStore> {
    match JsonFileStore::open(storage_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::warn!(
                path = %storage_path.display(),
                "本地存储不可用，会话将不会被保存: {}",
                err
            );
            Arc::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fs::test_support::unique_tmp_dir;

    #[test]
    fn init_shares_one_client_between_state_and_session() {
        let state = AppState::init(Arc::new(MemoryStore::new())).expect("init");
        assert!(Arc::ptr_eq(&state.api, state.session.api()));
        assert!(!state.notifier.is_subscribed());
        assert_eq!(state.api.base_url(), "http://localhost:5050");
    }

    #[test]
    fn init_surfaces_corrupt_profile() {
        let store = Arc::new(MemoryStore::new());
        store.set("user", "{").expect("seed");
        let err = AppState::init(store).err().expect("corrupt");
        assert!(err.starts_with("SESSION_CORRUPT_PROFILE"), "{err}");
    }

    #[test]
    fn open_store_falls_back_to_memory_on_unreadable_file() {
        let dir = unique_tmp_dir("app_state");
        let path = dir.join("storage.json");
        std::fs::write(&path, "not json").expect("write");

        let store = open_store(&path);
        store.set("token", "t").expect("memory set");
        assert_eq!(store.get("token").as_deref(), Some("t"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "not json");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_store_persists_through_file() {
        let dir = unique_tmp_dir("app_state");
        let path = dir.join("storage.json");

        open_store(&path).set("serverUrl", "http://h:1").expect("set");
        assert_eq!(
            open_store(&path).get("serverUrl").as_deref(),
            Some("http://h:1")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
