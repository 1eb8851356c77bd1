//! 兑换结果及其分类

use std::fmt;

/// 上游错误信息中表示"已兑换过"的关键字
const ALREADY_REDEEMED_MARKER: &str = "already";

/// 单次兑换尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// 兑换成功
    Success,
    /// 上游报告已经兑换过，视同成功，不再重试
    AlreadyRedeemed,
    /// 真正的失败，下次运行会重试
    Failed(String),
}

impl RedemptionOutcome {
    /// 根据上游的失败信息分类
    ///
    /// 小写后包含 "already" 视为已兑换，其余一律为失败。上游 API 只提供这一个信号，
    /// 不要改成按状态码判断。
    pub fn classify_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_lowercase().contains(ALREADY_REDEEMED_MARKER) {
            RedemptionOutcome::AlreadyRedeemed
        } else {
            RedemptionOutcome::Failed(message)
        }
    }

    /// 是否应记入兑换记录
    pub fn is_redeemed(&self) -> bool {
        matches!(
            self,
            RedemptionOutcome::Success | RedemptionOutcome::AlreadyRedeemed
        )
    }
}

impl fmt::Display for RedemptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedemptionOutcome::Success => write!(f, "success"),
            RedemptionOutcome::AlreadyRedeemed => write!(f, "already redeemed"),
            RedemptionOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
