//! 测试工具和辅助函数
//!
//! 提供可编排结果的协作方假实现

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use shift_autoredeem::core::store::HistoryStore;
use shift_autoredeem::{
    CodeCatalog, Platform, PlatformResolver, PlatformSet, RedemptionHistory, RedemptionOutcome,
    Redeemer, Result, ShiftCode, ShiftError,
};

/// 构造平台集合
pub fn platforms(ids: &[&str]) -> PlatformSet {
    ids.iter().map(|id| Platform::new(id)).collect()
}

/// 固定码列表
pub struct StaticCatalog(pub Vec<ShiftCode>);

#[async_trait]
impl CodeCatalog for StaticCatalog {
    async fn fetch_codes(&self) -> Result<Vec<ShiftCode>> {
        Ok(self.0.clone())
    }
}

/// 总是失败的码目录
pub struct FailingCatalog;

#[async_trait]
impl CodeCatalog for FailingCatalog {
    async fn fetch_codes(&self) -> Result<Vec<ShiftCode>> {
        Err(ShiftError::NetworkError("catalog unreachable".to_string()))
    }
}

/// 固定的用户平台
pub struct StaticPlatforms(pub PlatformSet);

#[async_trait]
impl PlatformResolver for StaticPlatforms {
    async fn fetch_owned_platforms(&self) -> Result<PlatformSet> {
        Ok(self.0.clone())
    }
}

/// 总是失败的平台解析
pub struct FailingResolver;

#[async_trait]
impl PlatformResolver for FailingResolver {
    async fn fetch_owned_platforms(&self) -> Result<PlatformSet> {
        Err(ShiftError::NetworkError("the request returned unexpected code 503".to_string()))
    }
}

/// 按 (code, platform) 编排结果的兑换客户端，未编排的返回成功
#[derive(Default)]
pub struct ScriptedRedeemer {
    failures: Mutex<HashMap<(String, String), String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRedeemer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定某个兑换对失败时上游返回的错误信息
    pub fn fail_with(self, code: &str, platform: &str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((code.to_string(), platform.to_string()), message.to_string());
        self
    }

    /// 按调用顺序返回的兑换对
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Redeemer for ScriptedRedeemer {
    async fn redeem(&self, code: &str, platform: &Platform) -> RedemptionOutcome {
        let key = (code.to_string(), platform.to_string());
        self.calls.lock().unwrap().push(key.clone());
        match self.failures.lock().unwrap().get(&key) {
            Some(message) => RedemptionOutcome::classify_failure(message.clone()),
            None => RedemptionOutcome::Success,
        }
    }
}

/// 保存总是失败的存储
pub struct ReadOnlyStore(pub Option<RedemptionHistory>);

#[async_trait]
impl HistoryStore for ReadOnlyStore {
    async fn load(&self, _key: &str) -> Result<Option<RedemptionHistory>> {
        Ok(self.0.clone())
    }

    async fn save(&self, _key: &str, _history: &RedemptionHistory) -> Result<()> {
        Err(ShiftError::StorageError("disk full".to_string()))
    }
}

/// 构造兑换记录
pub fn history(entries: &[(&str, &[&str])]) -> RedemptionHistory {
    let mut history = RedemptionHistory::new();
    for (code, ids) in entries {
        for id in ids.iter() {
            history.record(code, Platform::new(id));
        }
    }
    history
}
