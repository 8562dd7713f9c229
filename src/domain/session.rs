//! Usage: Authentication session (token, user profile, server URL) and its persisted lifecycle.
//!
//! The store is the single source of truth: every transition is written to the key-value store
//! and pushed into the [`ApiClient`] (base URL, default `Authorization` header).

use crate::infra::api_client::{ApiClient, ApiResponse, TOKEN_STORAGE_KEY};
use crate::infra::kv_store::KvStore;
use crate::shared::error::{RequestError, SessionError};
use crate::shared::mutex_ext::MutexExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5050";

pub(crate) const USER_STORAGE_KEY: &str = "user";
pub(crate) const SERVER_URL_STORAGE_KEY: &str = "serverUrl";

const LOGIN_PATH: &str = "/api/login";
const REGISTER_PATH: &str = "/api/register";
const USER_INFO_PATH: &str = "/api/user/info";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Value>,
    pub server_url: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Value,
}

fn credentials_body(username: &str, password: &str) -> Value {
    serde_json::json!({ "username": username, "password": password })
}

fn read_non_empty(store: &dyn KvStore, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `null` is stored and restored as "no profile"; memory follows the same rule.
fn profile_or_none(user: Value) -> Option<Value> {
    match user {
        Value::Null => None,
        value => Some(value),
    }
}

fn normalize_server_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return None;
    }
    Some(url.to_string())
}

pub struct SessionStore {
    store: Arc<dyn KvStore>,
    api: Arc<ApiClient>,
    session: Mutex<Session>,
}

impl SessionStore {
    pub fn load(store: Arc<dyn KvStore>, api: Arc<ApiClient>) -> Result<Self, SessionError> {
        let token = read_non_empty(store.as_ref(), TOKEN_STORAGE_KEY);
        let user = match read_non_empty(store.as_ref(), USER_STORAGE_KEY) {
            Some(raw) => profile_or_none(
                serde_json::from_str::<Value>(&raw)
                    .map_err(|e| SessionError::CorruptProfile(e.to_string()))?,
            ),
            None => None,
        };
        let server_url = read_non_empty(store.as_ref(), SERVER_URL_STORAGE_KEY)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        api.set_base_url(&server_url);
        api.set_token(token.as_deref());

        tracing::info!(
            server_url = %server_url,
            authenticated = token.is_some(),
            "session restored"
        );

        Ok(Self {
            store,
            api,
            session: Mutex::new(Session {
                token,
                user,
                server_url,
            }),
        })
    }

    pub fn snapshot(&self) -> Session {
        self.session.lock_or_recover().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.lock_or_recover().is_authenticated()
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn set_server(&self, url: &str) -> Result<(), SessionError> {
        let url = normalize_server_url(url).ok_or(SessionError::InvalidServerUrl)?;

        self.store
            .set(SERVER_URL_STORAGE_KEY, &url)
            .map_err(SessionError::Storage)?;
        self.session.lock_or_recover().server_url = url.clone();
        self.api.set_base_url(&url);

        tracing::info!(server_url = %url, "server url updated");
        Ok(())
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, SessionError> {
        let body = credentials_body(username, password);
        let response = self.api.post(LOGIN_PATH, &body).await?;
        let login: LoginResponse = serde_json::from_value(response.data)
            .map_err(|e| RequestError::Decode(format!("invalid login response: {e}")))?;

        let user_json = serde_json::to_string(&login.user)
            .map_err(|e| SessionError::Storage(format!("failed to serialize user: {e}")))?;

        let previous_token = self.store.get(TOKEN_STORAGE_KEY);
        self.store
            .set(TOKEN_STORAGE_KEY, &login.token)
            .map_err(SessionError::Storage)?;
        if let Err(err) = self.store.set(USER_STORAGE_KEY, &user_json) {
            self.restore_token(previous_token.as_deref());
            return Err(SessionError::Storage(err));
        }

        {
            let mut session = self.session.lock_or_recover();
            session.token = Some(login.token.clone());
            session.user = profile_or_none(login.user.clone());
        }
        self.api.set_token(Some(&login.token));

        tracing::info!(username = %username, "登录成功");
        Ok(login)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ApiResponse, SessionError> {
        let body = credentials_body(username, password);
        let response = self.api.post(REGISTER_PATH, &body).await?;
        tracing::info!(username = %username, status = response.status, "注册成功");
        Ok(response)
    }

    /// Re-fetches the profile of the logged-in user; the token is left as is.
    pub async fn refresh_user(&self) -> Result<Value, SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }

        let user = self.api.get(USER_INFO_PATH).await?.data;
        let user_json = serde_json::to_string(&user)
            .map_err(|e| SessionError::Storage(format!("failed to serialize user: {e}")))?;
        self.store
            .set(USER_STORAGE_KEY, &user_json)
            .map_err(SessionError::Storage)?;
        self.session.lock_or_recover().user = profile_or_none(user.clone());

        Ok(user)
    }

    /// Local only: no server call. Safe to call when already logged out.
    ///
    /// The stored token goes first: while it is still on disk the session stays authenticated.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store
            .remove(TOKEN_STORAGE_KEY)
            .map_err(SessionError::Storage)?;

        {
            let mut session = self.session.lock_or_recover();
            session.token = None;
            session.user = None;
        }
        self.api.set_token(None);

        self.store
            .remove(USER_STORAGE_KEY)
            .map_err(SessionError::Storage)?;

        tracing::info!("已退出登录");
        Ok(())
    }

    fn restore_token(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(token) => self.store.set(TOKEN_STORAGE_KEY, token),
            None => self.store.remove(TOKEN_STORAGE_KEY),
        };
        if let Err(err) = restored {
            tracing::error!("登录回滚失败，存储中的 token 可能与会话不一致: {}", err);
        }
    }
}
