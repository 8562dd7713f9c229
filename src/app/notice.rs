//! Notice（应用内提示）模块。
//!
//! 用法：
//! - 前端：监听 `notice:notify` 事件渲染 toast；`invoke("notice_send", { level, title?, body })` 触发提示
//! - Rust 后台：`Notifier::success/error/warning/info` 投递给当前订阅者；无订阅者时静默丢弃

use crate::shared::mutex_ext::MutexExt;
use std::sync::{Arc, Mutex};

pub const NOTICE_EVENT_NAME: &str = "notice:notify";

const NOTICE_PREFIX: &str = "GMX";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NoticeEventPayload {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

fn default_title(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "提示",
        NoticeLevel::Success => "成功",
        NoticeLevel::Warning => "提醒",
        NoticeLevel::Error => "错误",
    }
}

fn normalize_optional_title(title: Option<String>) -> Option<String> {
    let title = title?;
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn format_title(level: NoticeLevel, title: Option<String>) -> String {
    let title = normalize_optional_title(title).unwrap_or_else(|| default_title(level).to_string());
    format!("{NOTICE_PREFIX} · {title}")
}

pub fn build(level: NoticeLevel, title: Option<String>, body: String) -> NoticeEventPayload {
    NoticeEventPayload {
        level,
        title: format_title(level, title),
        body,
    }
}

type NoticeHandler = Arc<dyn Fn(&NoticeEventPayload) + Send + Sync>;

/// Single-target notice emitter. Subscribing again replaces the previous handler.
#[derive(Default)]
pub struct Notifier {
    handler: Mutex<Option<NoticeHandler>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&NoticeEventPayload) + Send + Sync + 'static,
    {
        *self.handler.lock_or_recover() = Some(Arc::new(handler));
    }

    pub fn unsubscribe(&self) {
        *self.handler.lock_or_recover() = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.handler.lock_or_recover().is_some()
    }

    /// Returns `false` when nobody is listening; the notice is dropped, not queued.
    pub fn notify(&self, payload: NoticeEventPayload) -> bool {
        // Clone the handler out so it runs without the lock held.
        let handler = self.handler.lock_or_recover().clone();
        match handler {
            Some(handler) => {
                handler(&payload);
                true
            }
            None => {
                tracing::debug!(level = ?payload.level, "notice dropped: no subscriber");
                false
            }
        }
    }

    pub fn show(&self, level: NoticeLevel, message: impl Into<String>) -> bool {
        self.notify(build(level, None, message.into()))
    }

    pub fn success(&self, message: impl Into<String>) -> bool {
        self.show(NoticeLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.show(NoticeLevel::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> bool {
        self.show(NoticeLevel::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> bool {
        self.show(NoticeLevel::Info, message)
    }
}

#[cfg(feature = "desktop")]
pub fn emit(app: &tauri::AppHandle, payload: NoticeEventPayload) -> Result<(), String> {
    use tauri::Emitter;

    app.emit(NOTICE_EVENT_NAME, payload)
        .map_err(|e| format!("NOTICE_EMIT: {e}"))?;
    Ok(())
}
