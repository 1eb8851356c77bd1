//! 厂商 SHIFT API 客户端
//!
//! 负责查询用户平台、查询单个码的适用平台以及发起兑换。
//! 兑换分两步：先 POST `/code/:code/redeem/:platform` 创建任务，
//! 等待任务给出的时间后再 GET `/code/:code/job/:job_id` 确认结果。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ORIGIN, REFERER};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::core::provider::{CodeCatalog, PlatformResolver, Redeemer};
use crate::domain::{Platform, PlatformSet, RedemptionOutcome, ShiftCode};
use crate::errors::{Result, ShiftError};

use super::http::{describe_status, join_url, unexpected_status, SITE_ORIGIN, SITE_REFERER};
use super::session::{ApiSession, SESSION_HEADER};

/// 默认厂商 API 根地址
pub const DEFAULT_API_BASE: &str = "https://api.2k.com/borderlands";

/// 码信息中用来识别本游戏的 offer_title
pub const DEFAULT_GAME_CODE_NAME: &str = "oak";

/// 等待兑换任务的时间上限
const DEFAULT_MAX_JOB_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct UserInfo {
    platforms: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CodeInfoList {
    entitlement_offer_codes: Option<Vec<CodeInfo>>,
}

#[derive(Debug, Deserialize)]
struct CodeInfo {
    offer_service: Option<String>,
    is_active: Option<bool>,
    offer_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RedemptionJob {
    job_id: Option<String>,
    max_wait_milliseconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    success: Option<bool>,
    errors: Option<Vec<String>>,
}

/// 厂商 API 客户端
#[derive(Debug, Clone)]
pub struct ShiftApiClient {
    http: reqwest::Client,
    api_base: String,
    session: ApiSession,
    game_code_name: String,
    max_job_wait: Duration,
}

impl ShiftApiClient {
    /// 使用已登录的会话创建客户端
    pub fn new(http: reqwest::Client, api_base: impl Into<String>, session: ApiSession) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            session,
            game_code_name: DEFAULT_GAME_CODE_NAME.to_string(),
            max_job_wait: DEFAULT_MAX_JOB_WAIT,
        }
    }

    pub fn with_game_code_name(mut self, name: impl Into<String>) -> Self {
        self.game_code_name = name.into();
        self
    }

    pub fn with_max_job_wait(mut self, wait: Duration) -> Self {
        self.max_job_wait = wait;
        self
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.api_base, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(SESSION_HEADER, self.session.session_id())
            .header(ORIGIN, SITE_ORIGIN)
            .header(REFERER, SITE_REFERER)
    }

    /// 查询单个码在本游戏下适用的平台
    ///
    /// 默认只保留处于激活状态的 offer，`allow_inactive` 为 true 时全部保留
    pub async fn code_platforms(&self, code: &str, allow_inactive: bool) -> Result<PlatformSet> {
        let url = self.url(&format!("code/{}/info", urlencoding::encode(code)));
        debug!(%url, "fetching code info");

        let resp = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|e| ShiftError::NetworkError(format!("http request error: {}", e)))?;
        if resp.status() != StatusCode::OK {
            return Err(unexpected_status(resp).await);
        }

        let list: CodeInfoList = resp
            .json()
            .await
            .map_err(|e| ShiftError::DecodeError(format!("could not JSON decode the response: {}", e)))?;

        let platforms = list
            .entitlement_offer_codes
            .unwrap_or_default()
            .into_iter()
            .filter(|info| info.offer_title.as_deref() == Some(self.game_code_name.as_str()))
            .filter(|info| allow_inactive || info.is_active == Some(true))
            .filter_map(|info| info.offer_service)
            .map(Platform::new)
            .filter(|p| !p.is_blank())
            .collect();

        Ok(platforms)
    }

    /// 发起一次兑换，失败时返回上游的错误描述
    async fn try_redeem(&self, code: &str, platform: &Platform) -> std::result::Result<(), String> {
        let code_path = urlencoding::encode(code);
        let url = self.url(&format!(
            "code/{}/redeem/{}",
            code_path,
            urlencoding::encode(platform.as_str())
        ));
        debug!(%url, "creating redemption job");

        let resp = self
            .authorized(self.http.post(&url))
            .send()
            .await
            .map_err(|e| format!("http request to redeem the code failed: {}", e))?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            let (err_code, err_msg) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(ErrorResponse { error: Some(err) }) => (
                    err.code.unwrap_or_else(|| "UNKNOWN".to_string()),
                    err.message.unwrap_or_default(),
                ),
                Ok(ErrorResponse { error: None }) => ("UNKNOWN".to_string(), body.clone()),
                Err(e) => (
                    "INTERNAL".to_string(),
                    format!("could not JSON decode the error: {}", e),
                ),
            };
            return Err(format!(
                "the request to redeem the code returned an unexpected code {} with error {} - {}",
                status.as_u16(),
                err_code,
                err_msg
            ));
        }

        let job: RedemptionJob = resp
            .json()
            .await
            .map_err(|e| format!("could not JSON decode the response: {}", e))?;
        let job_id = job
            .job_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "the redemption job has no id".to_string())?;

        // 等待任务完成后再确认
        if let Some(wait_ms) = job.max_wait_milliseconds {
            tokio::time::sleep(Duration::from_millis(wait_ms).min(self.max_job_wait)).await;
        }

        let url = self.url(&format!(
            "code/{}/job/{}",
            code_path,
            urlencoding::encode(&job_id)
        ));
        debug!(%url, "checking redemption job");

        let resp = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|e| format!("http request to check on the job failed: {}", e))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(describe_status(status, &body));
        }

        // 任务结果体可能为空，只有明确报告失败时才算失败
        if let Ok(job_status) = serde_json::from_str::<JobStatus>(&body) {
            let errors = job_status.errors.unwrap_or_default();
            if !errors.is_empty() {
                return Err(errors.join("; "));
            }
            if job_status.success == Some(false) {
                return Err("the redemption job did not succeed".to_string());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PlatformResolver for ShiftApiClient {
    async fn fetch_owned_platforms(&self) -> Result<PlatformSet> {
        let url = self.url("users/me");
        debug!(%url, "fetching user platforms");

        let resp = self
            .authorized(self.http.post(&url))
            .send()
            .await
            .map_err(|e| ShiftError::NetworkError(format!("http request error: {}", e)))?;
        if resp.status() != StatusCode::OK {
            return Err(unexpected_status(resp).await);
        }

        let info: UserInfo = resp
            .json()
            .await
            .map_err(|e| ShiftError::DecodeError(format!("could not JSON decode the response: {}", e)))?;
        let platforms = info.platforms.ok_or_else(|| {
            ShiftError::DecodeError("the user info has no platforms field".to_string())
        })?;

        Ok(platforms
            .into_iter()
            .map(Platform::new)
            .filter(|p| !p.is_blank() && !p.is_engagement_only())
            .collect())
    }
}

#[async_trait]
impl Redeemer for ShiftApiClient {
    async fn redeem(&self, code: &str, platform: &Platform) -> RedemptionOutcome {
        match self.try_redeem(code, platform).await {
            Ok(()) => RedemptionOutcome::Success,
            Err(message) => RedemptionOutcome::classify_failure(message),
        }
    }
}

/// 单码目录
///
/// 只包含用户指定的一个码，适用平台通过码信息接口查询
pub struct SingleCodeCatalog {
    client: ShiftApiClient,
    code: String,
    allow_inactive: bool,
}

impl SingleCodeCatalog {
    pub fn new(client: ShiftApiClient, code: impl Into<String>, allow_inactive: bool) -> Self {
        Self {
            client,
            code: code.into(),
            allow_inactive,
        }
    }
}

#[async_trait]
impl CodeCatalog for SingleCodeCatalog {
    async fn fetch_codes(&self) -> Result<Vec<ShiftCode>> {
        let platforms = self
            .client
            .code_platforms(&self.code, self.allow_inactive)
            .await?;
        Ok(vec![ShiftCode::for_platforms(self.code.clone(), platforms)])
    }
}
