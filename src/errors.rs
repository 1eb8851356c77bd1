//! 标准化错误处理
//!
//! 定义整次运行级别的致命错误。单个 (code, platform) 的兑换失败不属于这里，
//! 它们以 [`RedemptionOutcome`](crate::domain::RedemptionOutcome) 的形式留在引擎内部。

use thiserror::Error;

/// 运行级错误类型
#[derive(Error, Debug)]
pub enum ShiftError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 登录失败
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// 网络请求错误（传输失败或非预期状态码）
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 第三方响应无法解码
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// 兑换记录持久化错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 单码模式下没有任何可兑换的平台
    #[error("Redemption error: {0}")]
    RedemptionError(String),
}

impl ShiftError {
    /// 为错误信息加上动作上下文前缀，保留原有分类
    pub fn context(self, action: &str) -> Self {
        match self {
            ShiftError::ConfigError(msg) => ShiftError::ConfigError(format!("{action}: {msg}")),
            ShiftError::AuthError(msg) => ShiftError::AuthError(format!("{action}: {msg}")),
            ShiftError::NetworkError(msg) => ShiftError::NetworkError(format!("{action}: {msg}")),
            ShiftError::DecodeError(msg) => ShiftError::DecodeError(format!("{action}: {msg}")),
            ShiftError::StorageError(msg) => ShiftError::StorageError(format!("{action}: {msg}")),
            ShiftError::RedemptionError(msg) => {
                ShiftError::RedemptionError(format!("{action}: {msg}"))
            }
        }
    }
}

impl From<reqwest::Error> for ShiftError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ShiftError::DecodeError(err.to_string())
        } else {
            ShiftError::NetworkError(err.to_string())
        }
    }
}

impl From<std::io::Error> for ShiftError {
    fn from(err: std::io::Error) -> Self {
        ShiftError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ShiftError {
    fn from(err: serde_json::Error) -> Self {
        ShiftError::DecodeError(err.to_string())
    }
}

/// 项目结果类型别名
pub type Result<T> = std::result::Result<T, ShiftError>;
