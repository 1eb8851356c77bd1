//! 内存存储实现
//!
//! 数据仅在内存中，进程退出后丢失

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::RedemptionHistory;
use crate::errors::Result;

use super::HistoryStore;

/// 内存兑换记录存储
///
/// 适合测试和无需持久化的场景
pub struct MemoryHistoryStore {
    histories: RwLock<HashMap<String, RedemptionHistory>>,
}

impl MemoryHistoryStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
        }
    }

    /// 以已有记录初始化
    pub fn with_history(key: impl Into<String>, history: RedemptionHistory) -> Self {
        let mut histories = HashMap::new();
        histories.insert(key.into(), history);
        Self {
            histories: RwLock::new(histories),
        }
    }

    /// 读取当前保存的快照
    pub async fn snapshot(&self, key: &str) -> Option<RedemptionHistory> {
        self.histories.read().await.get(key).cloned()
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self, key: &str) -> Result<Option<RedemptionHistory>> {
        let histories = self.histories.read().await;
        Ok(histories.get(key).cloned())
    }

    async fn save(&self, key: &str, history: &RedemptionHistory) -> Result<()> {
        let mut histories = self.histories.write().await;
        histories.insert(key.to_string(), history.clone());
        Ok(())
    }
}
