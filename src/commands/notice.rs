//! Usage: Frontend-triggered notices (delivered back through the `notice:notify` event).

use crate::app::app_state::AppState;
use crate::notice::{self, NoticeLevel};

#[tauri::command]
pub(crate) fn notice_send(
    state: tauri::State<'_, AppState>,
    level: NoticeLevel,
    title: Option<String>,
    body: String,
) -> bool {
    state.notifier.notify(notice::build(level, title, body))
}
