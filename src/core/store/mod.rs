//! 兑换记录存储接口
//!
//! 提供持久化能力的抽象接口，支持内存和 JSON 文件实现

pub mod memory;

use async_trait::async_trait;

use crate::domain::RedemptionHistory;
use crate::errors::Result;

pub use memory::MemoryHistoryStore;

/// 兑换记录存储
///
/// `key` 是由用户身份派生的不透明标识
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 加载兑换记录
    ///
    /// 没有记录时返回 `None`，这不是错误，调用方应从空记录开始
    async fn load(&self, key: &str) -> Result<Option<RedemptionHistory>>;

    /// 保存兑换记录（完全覆盖）
    async fn save(&self, key: &str, history: &RedemptionHistory) -> Result<()>;

    /// 加载兑换记录，不存在时返回空记录
    async fn load_or_default(&self, key: &str) -> Result<RedemptionHistory> {
        Ok(self.load(key).await?.unwrap_or_default())
    }
}
