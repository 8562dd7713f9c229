pub mod app;
#[cfg(feature = "desktop")]
mod commands;
pub mod domain;
pub mod infra;
mod shared;

pub(crate) use app::notice;
pub use shared::error::{RequestError, SessionError};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use app::{app_state, logging, shell};
    use commands::*;
    use infra::app_paths;
    use tauri::Manager;

    let builder = tauri::Builder::default();

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    let builder = builder.plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
        shell::show_main_window(app);
    }));

    let app = builder
        .setup(|app| {
            let data_dir = app_paths::app_data_dir(app.handle())?;
            logging::init(&app_paths::logs_dir(&data_dir));
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                data_dir = %data_dir.display(),
                "GMX Desktop 启动"
            );

            let store = app_state::open_store(&app_paths::storage_path(&data_dir));
            let state = app_state::AppState::init(store)?;

            let app_handle = app.handle().clone();
            state.notifier.subscribe(move |payload| {
                if let Err(err) = notice::emit(&app_handle, payload.clone()) {
                    tracing::warn!("提示事件发送失败: {}", err);
                }
            });
            app.manage(state);

            shell::create_main_window(app.handle())?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            app_about_get,
            notice_send,
            session_get,
            session_set_server,
            session_login,
            session_register,
            session_logout,
            session_refresh_user,
            api_request
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { api, code, .. } = &event {
            // `code` is `None` when the last window closed rather than an explicit exit.
            if code.is_none() && !shell::quits_when_all_windows_closed(std::env::consts::OS) {
                tracing::info!("所有窗口已关闭，保持后台运行");
                api.prevent_exit();
            }
            return;
        }

        #[cfg(target_os = "macos")]
        if let tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } = event
        {
            if !has_visible_windows {
                shell::on_activate(app_handle);
            }
        }

        #[cfg(not(target_os = "macos"))]
        let _ = app_handle;
    });
}
