//! Tauri 命令模块
//!
//! 提供前端调用的所有 Tauri 命令接口，按功能分组：
//! - journal: 状态读写与条目管理命令
//! - imagen: 背景图生成命令

pub mod imagen;
pub mod journal;

// 重新导出所有命令
pub use imagen::*;
pub use journal::*;
