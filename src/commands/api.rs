//! Usage: Ad hoc API calls through the shared client.

use crate::app::app_state::AppState;
use crate::infra::api_client::{ApiResponse, HttpMethod};

#[tauri::command]
pub(crate) async fn api_request(
    state: tauri::State<'_, AppState>,
    method: HttpMethod,
    path: String,
    data: Option<serde_json::Value>,
) -> Result<ApiResponse, String> {
    state
        .api
        .request(method, &path, data.as_ref())
        .await
        .map_err(|e| e.to_string())
}
