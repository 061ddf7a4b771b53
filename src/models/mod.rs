// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};

/// 内容分类
///
/// 每个分类对应状态中一个独立的条目列表，条目创建后分类不可变更
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// 诗歌
    Poetry,
    /// 哲思
    Philosophy,
    /// 史话
    History,
}

impl Category {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Poetry => "诗歌",
            Self::Philosophy => "哲思",
            Self::History => "史话",
        }
    }
}

/// 用户档案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 用户名（完成引导后非空）
    pub name: String,
    /// 个人简介（可为空）
    pub bio: String,
    /// 是否已完成引导
    pub is_initialised: bool,
}

/// 诗歌条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poem {
    /// 唯一ID（由调用方生成）
    pub id: String,
    /// 标题
    pub title: String,
    /// 作者
    pub author: String,
    /// 正文
    pub content: String,
    /// 创建日期（展示用字符串，创建后不变）
    pub date: String,
    /// 所属分类
    #[serde(rename = "type")]
    pub category: Category,
    /// 背景图（data URI），未生成或生成失败时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

/// 文章条目（哲思/史话共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// 唯一ID（由调用方生成）
    pub id: String,
    /// 标题
    pub title: String,
    /// 作者
    pub author: String,
    /// 正文
    pub content: String,
    /// 创建日期（展示用字符串，创建后不变）
    pub date: String,
    /// 所属分类
    #[serde(rename = "type")]
    pub category: Category,
    /// 副标题
    pub tagline: String,
    /// 结语（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
    /// 参考文献（保持插入顺序）
    #[serde(default)]
    pub bibliography: Vec<BibliographyEntry>,
}

/// 参考文献条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibliographyEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub publication: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 新增条目（分类由内容决定）
#[derive(Debug, Clone)]
pub enum Entry {
    Poem(Poem),
    Article(Article),
}

/// 应用全量状态
///
/// 三个条目列表互相独立，均为最新在前；
/// 所有变更操作都返回新的快照，从不原地修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalState {
    /// 用户档案
    #[serde(default)]
    pub profile: UserProfile,
    /// 诗歌列表
    #[serde(default)]
    pub poems: Vec<Poem>,
    /// 哲思文章列表
    #[serde(default)]
    pub philosophy: Vec<Article>,
    /// 史话文章列表
    #[serde(default)]
    pub history: Vec<Article>,
}

impl JournalState {
    /// 完成引导，写入用户档案
    ///
    /// 姓名为空属于调用方未满足前置条件，此处按无操作处理
    pub fn complete_onboarding(&self, name: &str, bio: &str) -> JournalState {
        if name.trim().is_empty() {
            return self.clone();
        }

        let mut next = self.clone();
        next.profile = UserProfile {
            name: name.to_string(),
            bio: bio.to_string(),
            is_initialised: true,
        };
        next
    }

    /// 退出登录
    ///
    /// 仅重置用户档案，三个条目列表全部保留
    pub fn logout(&self) -> JournalState {
        let mut next = self.clone();
        next.profile = UserProfile::default();
        next
    }

    /// 新增条目，插入到对应分类列表头部
    ///
    /// ID、分类、日期由调用方负责填好；ID 唯一性此处不校验
    pub fn add_entry(&self, entry: Entry) -> JournalState {
        let mut next = self.clone();
        match entry {
            Entry::Poem(poem) => {
                debug_assert!(!poem.id.is_empty(), "条目ID不能为空");
                debug_assert_eq!(poem.category, Category::Poetry, "诗歌条目分类不匹配");
                next.poems.insert(0, poem);
            }
            Entry::Article(article) => {
                debug_assert!(!article.id.is_empty(), "条目ID不能为空");
                match article.category {
                    Category::Philosophy => next.philosophy.insert(0, article),
                    Category::History => next.history.insert(0, article),
                    // 文章不允许落入诗歌分类
                    Category::Poetry => debug_assert!(false, "文章条目分类不匹配"),
                }
            }
        }
        next
    }

    /// 删除指定分类下的条目
    ///
    /// 目标不存在时为无操作（幂等）
    pub fn delete_entry(&self, category: Category, id: &str) -> JournalState {
        let mut next = self.clone();
        match category {
            Category::Poetry => next.poems.retain(|p| p.id != id),
            Category::Philosophy => next.philosophy.retain(|a| a.id != id),
            Category::History => next.history.retain(|a| a.id != id),
        }
        next
    }

    /// 条目总数（用于启动日志）
    pub fn entry_count(&self) -> usize {
        self.poems.len() + self.philosophy.len() + self.history.len()
    }
}
