//! Usage: Tauri IPC commands exposed to the web frontend.

mod api;
mod app;
mod notice;
mod session;

pub(crate) use api::*;
pub(crate) use app::*;
pub(crate) use notice::*;
pub(crate) use session::*;

use crate::notice::{build, NoticeLevel, Notifier};

/// Routes a failed user action into the notice channel and hands the message back to IPC.
pub(crate) fn notify_failure(
    notifier: &Notifier,
    title: &str,
    err: impl std::fmt::Display,
) -> String {
    let message = err.to_string();
    tracing::warn!(action = %title, "{}", message);
    notifier.notify(build(NoticeLevel::Error, Some(title.to_string()), message.clone()));
    message
}
