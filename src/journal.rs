// 手记管理模块 - 持有内存中的应用状态，变更后同步落盘

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Category, Entry, JournalState};
use crate::store::StateStore;

/// 状态管理器
///
/// 唯一持有内存状态、唯一写入存储的组件。
/// 每次变更都在写锁内派生新快照并先落盘，落盘成功才替换内存状态，
/// 因此存储内容始终不落后于内存，下一次变更必然看到已持久化的状态
pub struct JournalManager {
    store: StateStore,
    state: RwLock<JournalState>,
}

impl JournalManager {
    /// 从存储恢复状态；无可用快照时从默认空状态启动
    pub async fn new(store: StateStore) -> Self {
        let initial = match store.load().await {
            Some(state) => {
                info!(
                    "已恢复历史状态: {} 条记录（{} 首诗歌 / {} 篇哲思 / {} 篇史话）",
                    state.entry_count(),
                    state.poems.len(),
                    state.philosophy.len(),
                    state.history.len()
                );
                state
            }
            None => {
                info!("无历史状态，使用默认空状态启动");
                JournalState::default()
            }
        };

        Self {
            store,
            state: RwLock::new(initial),
        }
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> JournalState {
        self.state.read().await.clone()
    }

    /// 整体替换状态（前端主动推送的全量保存）
    pub async fn replace(&self, state: JournalState) -> Result<JournalState> {
        let mut guard = self.state.write().await;
        self.store.save(&state).await?;
        *guard = state.clone();
        Ok(state)
    }

    /// 完成引导
    pub async fn complete_onboarding(&self, name: &str, bio: &str) -> Result<JournalState> {
        self.apply(|state| state.complete_onboarding(name, bio)).await
    }

    /// 退出登录（保留条目）
    pub async fn logout(&self) -> Result<JournalState> {
        self.apply(|state| state.logout()).await
    }

    /// 新增条目
    pub async fn add_entry(&self, entry: Entry) -> Result<JournalState> {
        self.apply(move |state| state.add_entry(entry)).await
    }

    /// 删除条目
    pub async fn delete_entry(&self, category: Category, id: &str) -> Result<JournalState> {
        self.apply(|state| state.delete_entry(category, id)).await
    }

    /// 应用一次变更
    ///
    /// 写锁内派生新快照并落盘；落盘失败时内存状态保持不变，错误向上传递
    async fn apply<F>(&self, mutate: F) -> Result<JournalState>
    where
        F: FnOnce(&JournalState) -> JournalState,
    {
        let mut guard = self.state.write().await;
        let next = mutate(&guard);
        self.store.save(&next).await?;
        *guard = next.clone();
        Ok(next)
    }
}
