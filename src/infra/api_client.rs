//! Usage: Shared HTTP client for the GMX server (base URL, bearer auth, blanket request timeout).
//!
//! Credentials reach a request through two paths:
//! - the default header installed by [`ApiClient::set_token`];
//! - a per-request read of the `token` entry in the key-value store, which wins when present.

use crate::infra::kv_store::KvStore;
use crate::shared::error::RequestError;
use crate::shared::mutex_ext::MutexExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Long-running server operations (mail fetches) must not be cut off early.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(600_000);

pub(crate) const TOKEN_STORAGE_KEY: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

pub struct ApiClient {
    http: reqwest::Client,
    store: Arc<dyn KvStore>,
    base_url: Mutex<String>,
    default_authorization: Mutex<Option<String>>,
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub(crate) fn join_url(base_url: &str, path: &str) -> Result<reqwest::Url, RequestError> {
    let joined = if is_absolute_url(path) {
        path.trim().to_string()
    } else {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(RequestError::InvalidUrl(format!(
                "no base url configured for path={path}"
            )));
        }
        let path = path.trim().trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    };

    reqwest::Url::parse(&joined)
        .map_err(|e| RequestError::InvalidUrl(format!("invalid url={joined}: {e}")))
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice::<Value>(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

impl ApiClient {
    pub fn new(store: Arc<dyn KvStore>) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RequestError::Client(e.to_string()))?;

        Ok(Self {
            http,
            store,
            base_url: Mutex::new(String::new()),
            default_authorization: Mutex::new(None),
        })
    }

    pub fn set_base_url(&self, url: &str) {
        *self.base_url.lock_or_recover() = url.trim().to_string();
    }

    pub fn base_url(&self) -> String {
        self.base_url.lock_or_recover().clone()
    }

    pub fn set_token(&self, token: Option<&str>) {
        *self.default_authorization.lock_or_recover() = non_empty(token).map(bearer);
    }

    pub fn default_authorization(&self) -> Option<String> {
        self.default_authorization.lock_or_recover().clone()
    }

    /// The `Authorization` value the next request will carry, if any.
    pub fn authorization_for_request(&self) -> Option<String> {
        let stored = self.store.get(TOKEN_STORAGE_KEY);
        match non_empty(stored.as_deref()) {
            Some(token) => Some(bearer(token)),
            None => self.default_authorization(),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub async fn post(&self, path: &str, data: &Value) -> Result<ApiResponse, RequestError> {
        self.request(HttpMethod::Post, path, Some(data)).await
    }

    pub async fn put(&self, path: &str, data: &Value) -> Result<ApiResponse, RequestError> {
        self.request(HttpMethod::Put, path, Some(data)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.request(HttpMethod::Delete, path, None).await
    }

    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&Value>,
    ) -> Result<ApiResponse, RequestError> {
        // Base URL and credentials are captured here; later changes only affect later calls.
        let url = join_url(&self.base_url(), path)?;
        let authorization = self.authorization_for_request();

        let mut builder = self.http.request(method.as_reqwest(), url.clone());
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(data) = data {
            builder = builder.json(data);
        }

        tracing::debug!(method = ?method, url = %url, "api request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = ?method, url = %url, "api request failed: {}", e);
            RequestError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(RequestError::from)?;
        let data = decode_body(&bytes);

        if !status.is_success() {
            tracing::warn!(
                method = ?method,
                url = %url,
                status = status.as_u16(),
                "api request rejected by server"
            );
            return Err(RequestError::from_status(status.as_u16(), &data));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}
