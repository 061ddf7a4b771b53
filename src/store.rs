// 状态存储模块 - 全量状态快照的落盘与读取

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::JournalState;

/// 持久化格式版本号，结构不兼容时递增
const SCHEMA_VERSION: u32 = 1;

/// 落盘的状态快照，在应用状态外包一层版本号
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    schema_version: u32,
    #[serde(flatten)]
    state: JournalState,
}

/// 状态存储
///
/// 固定单文件，每次保存都整体覆盖，不做增量合并
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 读取上次保存的状态
    ///
    /// 文件缺失、内容为空、解析失败、版本不匹配都按"无可用状态"处理，
    /// 由调用方回退到默认空状态；读取问题只记日志，不向上抛错
    pub async fn load(&self) -> Option<JournalState> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return None,
            Err(_) => {
                info!("未找到历史状态文件: {:?}", self.path);
                return None;
            }
        };

        match serde_json::from_slice::<PersistedState>(&bytes) {
            Ok(persisted) if persisted.schema_version == SCHEMA_VERSION => Some(persisted.state),
            Ok(persisted) => {
                warn!(
                    "状态文件版本不匹配（{} != {}），丢弃并使用默认状态",
                    persisted.schema_version, SCHEMA_VERSION
                );
                None
            }
            Err(e) => {
                warn!("状态文件解析失败，使用默认状态: {}", e);
                None
            }
        }
    }

    /// 全量保存当前状态，覆盖旧快照
    pub async fn save(&self, state: &JournalState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let persisted = PersistedState {
            schema_version: SCHEMA_VERSION,
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&persisted)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Entry, Poem};

    fn sample_state() -> JournalState {
        let poem = Poem {
            id: "p1".to_string(),
            title: "暮色".to_string(),
            author: "A".to_string(),
            content: "云向西去".to_string(),
            date: "2026-08-07".to_string(),
            category: Category::Poetry,
            background_image: Some("data:image/png;base64,QUJD".to_string()),
        };
        JournalState::default()
            .complete_onboarding("张三", "写诗的人")
            .add_entry(Entry::Poem(poem))
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("journal.json"));

        let state = sample_state();
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("journal.json"));

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        tokio::fs::write(&path, "{{ 不是合法的JSON").await.unwrap();

        let store = StateStore::new(path);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_load_version_mismatch_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        // 版本号不认识的快照整体丢弃
        let blob = serde_json::json!({
            "schemaVersion": 99,
            "profile": { "name": "张三", "bio": "", "isInitialised": true },
            "poems": [],
            "philosophy": [],
            "history": []
        });
        tokio::fs::write(&path, blob.to_string()).await.unwrap();

        let store = StateStore::new(path);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("data").join("journal.json"));

        store.save(&JournalState::default()).await.unwrap();
        assert!(store.load().await.is_some());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("journal.json"));

        store.save(&sample_state()).await.unwrap();
        store.save(&JournalState::default()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, JournalState::default());
    }
}
