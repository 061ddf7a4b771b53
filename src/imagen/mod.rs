// 图像生成模块 - 管理AI配图服务

pub mod gemini;

pub use gemini::GeminiImageClient;

use async_trait::async_trait;

/// 图像生成服务抽象
///
/// 配图是尽力而为的增强能力：两个操作都只返回 Option，
/// 任何失败（网络、鉴权、空响应）在内部记日志并返回 None，
/// 调用方把"无图"当作正常结果继续走条目创建流程
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// 根据标题和正文生成背景图，返回 data URI
    async fn generate_from_text(&self, title: &str, content: &str) -> Option<String>;

    /// 在已有背景图上按指令修改，返回新的 data URI
    async fn edit_from_image(&self, image_data_uri: &str, instruction: &str) -> Option<String>;
}
