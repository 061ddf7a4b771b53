// 心迹手记 - Tauri应用主库

// 声明模块
pub mod app;
pub mod commands;
pub mod imagen;
pub mod journal;
pub mod logger;
pub mod models;
pub mod store;

use std::sync::Arc;

use imagen::ImageGenerator;
use journal::JournalManager;

pub use app::run;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 状态管理器（内存状态与存储的唯一写入者）
    pub journal: Arc<JournalManager>,
    /// 图像生成客户端
    pub imagen: Arc<dyn ImageGenerator>,
}
