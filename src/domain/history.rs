//! 兑换记录
//!
//! 码值 -> 已确认兑换过的平台集合。只追加不删除，跨次运行持续累积。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::platform::{Platform, PlatformSet};

/// 兑换记录
///
/// 序列化为 `{"CODE": ["steam", "epic"]}` 形式的 JSON 对象
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionHistory {
    entries: BTreeMap<String, PlatformSet>,
}

impl RedemptionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 该 (code, platform) 是否已记录
    pub fn contains(&self, code: &str, platform: &Platform) -> bool {
        self.entries
            .get(code)
            .is_some_and(|platforms| platforms.contains(platform))
    }

    /// 记录一次已兑换，新增时返回 true
    pub fn record(&mut self, code: &str, platform: Platform) -> bool {
        self.entries
            .entry(code.to_string())
            .or_default()
            .insert(platform)
    }

    /// 记录中码的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有 (code, platform) 对的数量
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(PlatformSet::len).sum()
    }
}
