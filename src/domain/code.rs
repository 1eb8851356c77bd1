//! SHIFT 码模型

use serde::{Deserialize, Serialize};

use super::platform::{Platform, PlatformSet};

/// 一个可兑换的 SHIFT 码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCode {
    /// 不透明的码值，只作为键使用
    pub code: String,
    /// 奖励描述，仅用于展示
    pub reward: Option<String>,
    /// 为 true 时对用户拥有的所有平台有效，忽略 `platforms`
    pub is_universal: bool,
    /// 已知适用的平台
    pub platforms: PlatformSet,
}

impl ShiftCode {
    /// 创建全平台通用码
    pub fn universal(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reward: None,
            is_universal: true,
            platforms: PlatformSet::new(),
        }
    }

    /// 创建仅适用于指定平台的码
    pub fn for_platforms<I, P>(code: impl Into<String>, platforms: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Platform>,
    {
        Self {
            code: code.into(),
            reward: None,
            is_universal: false,
            platforms: platforms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.reward = Some(reward.into());
        self
    }

    /// 计算本码在当前用户下的有效平台集合
    ///
    /// - 通用码：用户拥有的全部平台
    /// - 其他：码列出的平台中用户拥有的那部分
    pub fn effective_platforms(&self, owned: &PlatformSet) -> PlatformSet {
        if self.is_universal {
            owned.clone()
        } else {
            self.platforms.intersection(owned)
        }
    }
}

/// 规范化用户输入的码值：去除空白并转大写
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}
