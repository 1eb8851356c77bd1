//! 外部协作方接口
//!
//! 引擎只依赖这些 trait，具体的 HTTP 实现在 infrastructure 层

use async_trait::async_trait;

use crate::domain::{Platform, PlatformSet, RedemptionOutcome, ShiftCode};
use crate::errors::Result;

/// 码目录：返回当前已知的全部 SHIFT 码
#[async_trait]
pub trait CodeCatalog: Send + Sync {
    /// 获取码列表，顺序即目录顺序
    async fn fetch_codes(&self) -> Result<Vec<ShiftCode>>;
}

/// 用户平台解析
#[async_trait]
pub trait PlatformResolver: Send + Sync {
    /// 获取用户拥有的平台（已排除只能观看的渠道）
    async fn fetch_owned_platforms(&self) -> Result<PlatformSet>;
}

/// 兑换客户端
///
/// 对单个 (code, platform) 发起兑换。失败不会以 `Err` 返回，
/// 而是分类成 [`RedemptionOutcome`]，保证一次失败不会中断整次运行。
#[async_trait]
pub trait Redeemer: Send + Sync {
    async fn redeem(&self, code: &str, platform: &Platform) -> RedemptionOutcome;
}
