//! 日志模块
//!
//! 诊断日志统一写到标准错误，标准输出只留给逐条的进度信息。
//!
//! # 环境变量
//! - `RUST_LOG`: 日志级别过滤（如 `info`, `debug`, `warn,shift_autoredeem=trace`）

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志格式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式（带颜色）
    Pretty,
    /// 紧凑单行格式
    Compact,
    /// JSON 结构化格式（适合日志收集系统）
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// 默认过滤器：未设置 `RUST_LOG` 时只输出警告，避免淹没进度信息
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// 初始化日志系统
pub fn init(format: LogFormat) {
    let subscriber = tracing_subscriber::registry().with(env_filter());

    match format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
    }
}
