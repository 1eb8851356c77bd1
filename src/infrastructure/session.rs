//! 登录与会话
//!
//! 登录成功后得到一个不可变的 [`ApiSession`]，由调用方显式传给厂商客户端，
//! 不在客户端内部维护可变的全局请求头。

use std::fmt;

use reqwest::header::{ORIGIN, REFERER};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::errors::{Result, ShiftError};

use super::http::{join_url, SITE_ORIGIN, SITE_REFERER};

/// 登录响应中携带会话 ID 的头
pub const SESSION_SET_HEADER: &str = "X-SESSION-SET";

/// 后续请求携带会话 ID 的头
pub const SESSION_HEADER: &str = "X-SESSION";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// 已认证的会话
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSession {
    session_id: String,
}

impl ApiSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 使用邮箱和密码登录
    ///
    /// 登录接口返回 200 且带有 `X-SESSION-SET` 头时视为成功
    pub async fn login(
        http: &reqwest::Client,
        api_base: &str,
        email: &str,
        password: &str,
    ) -> Result<Self> {
        let url = join_url(api_base, "users/authenticate");
        debug!(%url, "submitting login credentials");

        let resp = http
            .post(&url)
            .header(ORIGIN, SITE_ORIGIN)
            .header(REFERER, SITE_REFERER)
            .json(&LoginRequest {
                username: email,
                password,
            })
            .send()
            .await
            .map_err(|e| ShiftError::AuthError(format!("could not submit login credentials: {}", e)))?;

        if resp.status() != StatusCode::OK {
            return Err(ShiftError::AuthError(format!(
                "login request returned unexpected status code {}",
                resp.status().as_u16()
            )));
        }

        let session_id = resp
            .headers()
            .get(SESSION_SET_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ShiftError::AuthError("could not find session header".to_string()))?;

        Ok(Self::new(session_id))
    }
}

// 会话 ID 等同于凭证，不能出现在日志里
impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSession")
            .field("session_id", &"<redacted>")
            .finish()
    }
}
