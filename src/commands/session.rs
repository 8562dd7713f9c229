//! Usage: Session commands (server selection, login/register/logout, profile refresh).

use super::notify_failure;
use crate::app::app_state::AppState;
use crate::domain::session::{LoginResponse, Session};
use crate::infra::api_client::ApiResponse;

#[tauri::command]
pub(crate) fn session_get(state: tauri::State<'_, AppState>) -> Session {
    state.session.snapshot()
}

#[tauri::command]
pub(crate) fn session_set_server(
    state: tauri::State<'_, AppState>,
    url: String,
) -> Result<Session, String> {
    state
        .session
        .set_server(&url)
        .map_err(|e| notify_failure(&state.notifier, "服务器地址无效", e))?;
    state.notifier.success("服务器地址已保存");
    Ok(state.session.snapshot())
}

#[tauri::command]
pub(crate) async fn session_login(
    state: tauri::State<'_, AppState>,
    username: String,
    password: String,
) -> Result<LoginResponse, String> {
    state
        .session
        .login(username.trim(), &password)
        .await
        .map_err(|e| notify_failure(&state.notifier, "登录失败", e))
}

#[tauri::command]
pub(crate) async fn session_register(
    state: tauri::State<'_, AppState>,
    username: String,
    password: String,
) -> Result<ApiResponse, String> {
    let response = state
        .session
        .register(username.trim(), &password)
        .await
        .map_err(|e| notify_failure(&state.notifier, "注册失败", e))?;
    state.notifier.success("注册成功，请登录");
    Ok(response)
}

#[tauri::command]
pub(crate) fn session_logout(state: tauri::State<'_, AppState>) -> Result<Session, String> {
    state
        .session
        .logout()
        .map_err(|e| notify_failure(&state.notifier, "退出登录失败", e))?;
    Ok(state.session.snapshot())
}

#[tauri::command]
pub(crate) async fn session_refresh_user(
    state: tauri::State<'_, AppState>,
) -> Result<serde_json::Value, String> {
    state
        .session
        .refresh_user()
        .await
        .map_err(|e| notify_failure(&state.notifier, "用户信息刷新失败", e))
}
