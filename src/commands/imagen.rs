//! 背景图生成命令
//!
//! 配图是尽力而为的增强：两个命令都返回 Ok(Option)，
//! 生成失败只体现为 None，前端把"无图"当作正常结果处理

use crate::AppState;

/// 根据标题和正文生成诗歌背景图
#[tauri::command]
pub async fn generate_poem_background(
    state: tauri::State<'_, AppState>,
    title: String,
    content: String,
) -> Result<Option<String>, String> {
    Ok(state.imagen.generate_from_text(&title, &content).await)
}

/// 在已有背景图上按指令修改
#[tauri::command]
pub async fn edit_poem_background(
    state: tauri::State<'_, AppState>,
    image: String,
    instruction: String,
) -> Result<Option<String>, String> {
    Ok(state.imagen.edit_from_image(&image, &instruction).await)
}
