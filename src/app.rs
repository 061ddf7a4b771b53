//! 应用程序初始化和启动
//!
//! 负责 Tauri 应用的完整启动流程，包括：
//! - 日志系统初始化
//! - 应用数据目录创建
//! - 状态恢复与管理器初始化
//! - HTTP 客户端与图像生成客户端初始化
//! - Tauri Builder 配置与命令注册

use std::sync::Arc;

use tauri::Manager;
use tracing::info;

use crate::commands::*;
use crate::imagen::{GeminiImageClient, ImageGenerator};
use crate::journal::JournalManager;
use crate::logger;
use crate::store::StateStore;
use crate::AppState;

/// 状态文件名（应用数据目录下的固定位置）
const STATE_FILE_NAME: &str = "journal.json";

/// 应用程序入口点
///
/// 初始化并启动 Tauri 应用：
/// 1. 日志系统初始化
/// 2. 应用数据目录创建
/// 3. 从存储恢复状态（缺失/损坏时回退到默认空状态）
/// 4. 初始化图像生成客户端
/// 5. Tauri 命令注册
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logger::init().expect("Failed to initialize logger");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            info!("初始化心迹手记...");

            let app_dir = app.path().app_data_dir().map_err(|e| e.to_string())?;
            std::fs::create_dir_all(&app_dir).map_err(|e| e.to_string())?;

            let state = tauri::async_runtime::block_on(async {
                // 从存储恢复上次的状态
                let store = StateStore::new(app_dir.join(STATE_FILE_NAME));
                let journal = Arc::new(JournalManager::new(store).await);

                // 创建共享的 HTTP 客户端（图像生成调用复用连接池）
                let http_client = reqwest::Client::builder()
                    .timeout(std::time::Duration::from_secs(120))
                    .build()
                    .expect("无法创建 HTTP 客户端");

                let imagen: Arc<dyn ImageGenerator> =
                    Arc::new(GeminiImageClient::from_env(http_client));

                AppState { journal, imagen }
            });

            app.manage(state);
            info!("心迹手记初始化完成");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            load_state,
            save_state,
            complete_onboarding,
            logout,
            create_poem,
            create_article,
            delete_entry,
            generate_poem_background,
            edit_poem_background,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
