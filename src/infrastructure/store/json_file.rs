//! JSON 文件存储实现
//!
//! 每个用户一个 JSON 文件，位于用户级配置目录下

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::core::store::HistoryStore;
use crate::domain::RedemptionHistory;
use crate::errors::{Result, ShiftError};

/// 配置目录下的应用子目录名
pub const APP_DIR_NAME: &str = "shift-autoredeem";

/// 由登录邮箱派生存储键
///
/// 使用 SHA-256 十六进制摘要，文件名里不出现邮箱本身
pub fn history_key(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    hex::encode(digest)
}

/// JSON 文件兑换记录存储
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    dir: PathBuf,
}

impl JsonFileHistoryStore {
    /// 在指定目录下存储
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 在当前用户的配置目录下存储
    pub fn in_user_config_dir() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            ShiftError::ConfigError("could not locate the user configuration directory".to_string())
        })?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    /// 某个键对应的文件路径
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}-shift-codes.json", key))
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    /// 文件缺失、无法读取或内容损坏都按"没有记录"处理
    async fn load(&self, key: &str) -> Result<Option<RedemptionHistory>> {
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no redemption history yet");
                return Ok(None);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read redemption history, starting fresh");
                return Ok(None);
            }
        };

        match serde_json::from_slice::<RedemptionHistory>(&bytes) {
            Ok(history) => Ok(Some(history)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed redemption history, starting fresh");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, history: &RedemptionHistory) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let data = serde_json::to_vec_pretty(history).map_err(|e| {
            ShiftError::StorageError(format!("could not JSON encode the redemption history: {}", e))
        })?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ShiftError::StorageError(format!("could not create {}: {}", self.dir.display(), e))
        })?;

        // 先写临时文件再改名，避免中途崩溃留下半截文件
        tokio::fs::write(&tmp_path, &data).await.map_err(|e| {
            ShiftError::StorageError(format!("could not write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            ShiftError::StorageError(format!("could not replace {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), codes = history.len(), "redemption history saved");
        Ok(())
    }
}
