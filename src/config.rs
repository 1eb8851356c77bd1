//! 命令行与环境变量配置

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::domain::normalize_code;
use crate::errors::{Result, ShiftError};
use crate::infrastructure::catalog::DEFAULT_CATALOG_URL;
use crate::infrastructure::logger::LogFormat;
use crate::infrastructure::vendor::{DEFAULT_API_BASE, DEFAULT_GAME_CODE_NAME};

#[derive(Parser, Clone)]
#[command(
    author,
    version,
    about = "Automatically redeem SHIFT codes on every platform you own"
)]
pub struct AppConfig {
    /// 登录邮箱
    #[arg(long, env = "SHIFT_EMAIL")]
    pub email: String,

    /// 登录密码
    #[arg(long = "psw", env = "SHIFT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// 只兑换这一个码
    #[arg(long = "shift-code", env = "SHIFT_CODE")]
    pub shift_code: Option<String>,

    /// 单码模式下也尝试未激活的平台
    #[arg(long, env = "SHIFT_ALLOW_INACTIVE")]
    pub allow_inactive: bool,

    /// 厂商 API 根地址
    #[arg(long, env = "SHIFT_API_BASE_URL", default_value = DEFAULT_API_BASE)]
    pub api_base_url: String,

    /// 公开码目录地址
    #[arg(long, env = "SHIFT_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// 码信息中本游戏的 offer_title
    #[arg(long, env = "SHIFT_GAME_CODE_NAME", default_value = DEFAULT_GAME_CODE_NAME)]
    pub game_code_name: String,

    /// 兑换记录目录，默认为用户配置目录
    #[arg(long, env = "SHIFT_HISTORY_DIR")]
    pub history_dir: Option<PathBuf>,

    /// 日志格式: pretty, compact, json
    #[arg(long, env = "LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// 单个 HTTP 请求超时（秒）
    #[arg(long, env = "SHIFT_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// 校验配置，在任何网络请求之前调用
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(ShiftError::ConfigError("email must not be empty".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(ShiftError::ConfigError("password must not be empty".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(ShiftError::ConfigError(
                "http timeout must be at least one second".to_string(),
            ));
        }
        if self.single_code().is_some_and(|code| code.is_empty()) {
            return Err(ShiftError::ConfigError("shift code must not be empty".to_string()));
        }
        Ok(())
    }

    /// 单码模式下规范化后的码
    pub fn single_code(&self) -> Option<String> {
        self.shift_code.as_deref().map(normalize_code)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// 手写 Debug，避免密码出现在日志里
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("shift_code", &self.shift_code)
            .field("allow_inactive", &self.allow_inactive)
            .field("api_base_url", &self.api_base_url)
            .field("catalog_url", &self.catalog_url)
            .field("game_code_name", &self.game_code_name)
            .field("history_dir", &self.history_dir)
            .field("log_format", &self.log_format)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}
