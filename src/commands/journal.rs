//! 状态读写与条目管理命令
//!
//! 条目的唯一ID和展示日期在这一层分配；
//! 状态变更全部经由 JournalManager，变更落盘后才返回新快照

use chrono::Local;
use tracing::info;
use uuid::Uuid;

use crate::imagen::ImageGenerator;
use crate::models::{
    Article, BibliographyEntry, Category, Entry, JournalState, Poem,
};
use crate::AppState;

/// 新建诗歌的表单内容
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoem {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// 新建文章的表单内容
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub tagline: String,
    pub closing_note: Option<String>,
    #[serde(default)]
    pub bibliography: Vec<NewBibliographyEntry>,
}

/// 新建参考文献行
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBibliographyEntry {
    pub title: String,
    pub author: String,
    pub publication: String,
    pub url: Option<String>,
}

/// 生成条目唯一ID
fn next_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// 创建时间的展示字符串
fn display_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// 校验文章允许的分类（诗歌分类只收诗歌条目）
fn validate_article_category(category: Category) -> Result<(), String> {
    match category {
        Category::Philosophy | Category::History => Ok(()),
        Category::Poetry => Err("文章条目不能使用诗歌分类".to_string()),
    }
}

/// 组装诗歌条目：先尽力生成背景图，失败时照常创建无图条目
///
/// 生成结果只绑定到本次调用构造的条目上，晚到的响应不会影响其他条目
pub(crate) async fn compose_poem(imagen: &dyn ImageGenerator, draft: NewPoem) -> Poem {
    let background_image = imagen
        .generate_from_text(&draft.title, &draft.content)
        .await;

    Poem {
        id: next_entry_id(),
        title: draft.title,
        author: draft.author,
        content: draft.content,
        date: display_date(),
        category: Category::Poetry,
        background_image,
    }
}

/// 组装文章条目，参考文献按提交顺序逐条分配ID
pub(crate) fn compose_article(category: Category, draft: NewArticle) -> Article {
    let bibliography = draft
        .bibliography
        .into_iter()
        .map(|entry| BibliographyEntry {
            id: next_entry_id(),
            title: entry.title,
            author: entry.author,
            publication: entry.publication,
            url: entry.url,
        })
        .collect();

    Article {
        id: next_entry_id(),
        title: draft.title,
        author: draft.author,
        content: draft.content,
        date: display_date(),
        category,
        tagline: draft.tagline,
        closing_note: draft.closing_note,
        bibliography,
    }
}

/// 获取当前全量状态（启动时前端据此恢复页面）
#[tauri::command]
pub async fn load_state(state: tauri::State<'_, AppState>) -> Result<JournalState, String> {
    Ok(state.journal.snapshot().await)
}

/// 整体保存前端推送的全量状态
#[tauri::command]
pub async fn save_state(
    state: tauri::State<'_, AppState>,
    snapshot: JournalState,
) -> Result<JournalState, String> {
    state
        .journal
        .replace(snapshot)
        .await
        .map_err(|e| e.to_string())
}

/// 完成引导，写入用户档案
#[tauri::command]
pub async fn complete_onboarding(
    state: tauri::State<'_, AppState>,
    name: String,
    bio: String,
) -> Result<JournalState, String> {
    state
        .journal
        .complete_onboarding(&name, &bio)
        .await
        .map_err(|e| e.to_string())
}

/// 退出登录（仅重置档案，条目保留）
#[tauri::command]
pub async fn logout(state: tauri::State<'_, AppState>) -> Result<JournalState, String> {
    info!("退出登录，保留全部条目");
    state.journal.logout().await.map_err(|e| e.to_string())
}

/// 创建诗歌条目
///
/// 始终先尝试生成背景图；生成失败不阻塞创建，条目以无图方式保存
#[tauri::command]
pub async fn create_poem(
    state: tauri::State<'_, AppState>,
    poem: NewPoem,
) -> Result<JournalState, String> {
    let poem = compose_poem(state.imagen.as_ref(), poem).await;
    info!(
        "创建诗歌: {}（背景图: {}）",
        poem.title,
        if poem.background_image.is_some() {
            "已生成"
        } else {
            "无"
        }
    );

    state
        .journal
        .add_entry(Entry::Poem(poem))
        .await
        .map_err(|e| e.to_string())
}

/// 创建文章条目（哲思/史话）
#[tauri::command]
pub async fn create_article(
    state: tauri::State<'_, AppState>,
    category: Category,
    article: NewArticle,
) -> Result<JournalState, String> {
    validate_article_category(category)?;

    let article = compose_article(category, article);
    info!("创建{}: {}", category.display_name(), article.title);

    state
        .journal
        .add_entry(Entry::Article(article))
        .await
        .map_err(|e| e.to_string())
}

/// 删除指定分类下的条目（目标不存在时为无操作）
#[tauri::command]
pub async fn delete_entry(
    state: tauri::State<'_, AppState>,
    category: Category,
    id: String,
) -> Result<JournalState, String> {
    state
        .journal
        .delete_entry(category, &id)
        .await
        .map_err(|e| e.to_string())
}
