//! HTTP 客户端构建
//!
//! 所有适配器共用一个带 cookie 的 reqwest 客户端

use std::time::Duration;

use reqwest::StatusCode;

use crate::errors::{Result, ShiftError};

/// 固定的 User-Agent
pub const USER_AGENT: &str = concat!("shift-autoredeem/", env!("CARGO_PKG_VERSION"));

/// 厂商 API 要求的 Origin
pub const SITE_ORIGIN: &str = "https://borderlands.com";

/// 厂商 API 要求的 Referer
pub const SITE_REFERER: &str = "https://borderlands.com/en-US/vip/";

/// 创建 HTTP 客户端
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .gzip(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ShiftError::ConfigError(format!("could not create http client: {}", e)))
}

/// 拼接 API 根地址和路径
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// 将非预期状态码的响应转为网络错误，附带响应体
pub(crate) async fn unexpected_status(resp: reqwest::Response) -> ShiftError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ShiftError::NetworkError(describe_status(status, &body))
}

pub(crate) fn describe_status(status: StatusCode, body: &str) -> String {
    format!(
        "the request returned unexpected code {} with body {}",
        status.as_u16(),
        body
    )
}
