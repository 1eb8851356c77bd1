//! 公开聚合站点的码目录
//!
//! 聚合站点的格式与厂商不同：每个码只带一个平台字段，值为 `Universal` 时表示通用码。

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::core::provider::CodeCatalog;
use crate::domain::{Platform, PlatformSet, ShiftCode};
use crate::errors::{Result, ShiftError};

use super::http::unexpected_status;

/// 默认聚合源
pub const DEFAULT_CATALOG_URL: &str = "https://shift.orcicorn.com/tags/borderlands3/index.json";

#[derive(Debug, Deserialize)]
struct CodeFeed {
    codes: Option<Vec<FeedCode>>,
}

#[derive(Debug, Deserialize)]
struct FeedCode {
    code: Option<String>,
    platform: Option<String>,
    reward: Option<String>,
}

impl FeedCode {
    /// 转为领域模型，码值缺失时丢弃
    fn into_shift_code(self) -> Option<ShiftCode> {
        let code = self.code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())?;
        let reward = self.reward.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

        let (is_universal, platforms) = match self.platform.map(Platform::new) {
            Some(p) if p.is_universal() => (true, PlatformSet::new()),
            Some(p) if !p.is_blank() => (false, std::iter::once(p).collect()),
            _ => (false, PlatformSet::new()),
        };

        Some(ShiftCode {
            code,
            reward,
            is_universal,
            platforms,
        })
    }
}

/// 把聚合源的响应体解析为码列表
///
/// 响应是只包含一个元素的数组，空数组表示当前没有码
pub fn parse_feed(body: &str) -> Result<Vec<ShiftCode>> {
    let feeds: Vec<CodeFeed> = serde_json::from_str(body)
        .map_err(|e| ShiftError::DecodeError(format!("could not JSON decode the response: {}", e)))?;

    let Some(feed) = feeds.into_iter().next() else {
        return Ok(Vec::new());
    };

    Ok(feed
        .codes
        .unwrap_or_default()
        .into_iter()
        .filter_map(FeedCode::into_shift_code)
        .collect())
}

/// 聚合站点目录
#[derive(Debug, Clone)]
pub struct OrcicornCatalog {
    http: reqwest::Client,
    url: String,
}

impl OrcicornCatalog {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CodeCatalog for OrcicornCatalog {
    async fn fetch_codes(&self) -> Result<Vec<ShiftCode>> {
        debug!(url = %self.url, "fetching code list");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ShiftError::NetworkError(format!("http request error: {}", e)))?;
        if resp.status() != StatusCode::OK {
            return Err(unexpected_status(resp).await);
        }

        let body = resp.text().await?;
        let codes = parse_feed(&body)?;
        debug!(count = codes.len(), "code list fetched");
        Ok(codes)
    }
}
