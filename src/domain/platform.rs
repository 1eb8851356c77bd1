//! 平台标识
//!
//! 平台是不透明的小写字符串，不做枚举校验，上游报告什么就透传什么。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 仅用于观看/互动的渠道，无法接收兑换
const ENGAGEMENT_ONLY_PLATFORMS: &[&str] = &["twitch"];

/// 目录中表示"全平台通用"的平台值
pub const UNIVERSAL_PLATFORM: &str = "universal";

/// 平台标识（入口处统一转为小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Platform(String);

impl Platform {
    /// 创建平台标识，只做小写化，其余原样保留
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_lowercase())
    }

    /// 是否为空白标识，入口处应丢弃
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为通用平台标记
    pub fn is_universal(&self) -> bool {
        self.0 == UNIVERSAL_PLATFORM
    }

    /// 是否为只能观看、不能兑换的渠道（例如直播平台）
    pub fn is_engagement_only(&self) -> bool {
        ENGAGEMENT_ONLY_PLATFORMS.contains(&self.0.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Platform {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.0
    }
}

/// 平台集合
///
/// 保留首次插入顺序并去重，迭代顺序因此稳定且可复现。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Platform>", into = "Vec<Platform>")]
pub struct PlatformSet(Vec<Platform>);

impl PlatformSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 插入平台，已存在时返回 false
    pub fn insert(&mut self, platform: Platform) -> bool {
        if self.contains(&platform) {
            return false;
        }
        self.0.push(platform);
        true
    }

    pub fn contains(&self, platform: &Platform) -> bool {
        self.0.iter().any(|p| p == platform)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 只保留同时出现在 `other` 中的平台，顺序沿用 self
    pub fn intersection(&self, other: &PlatformSet) -> PlatformSet {
        self.0.iter().filter(|p| other.contains(p)).cloned().collect()
    }
}

impl FromIterator<Platform> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        let mut set = PlatformSet::new();
        for platform in iter {
            set.insert(platform);
        }
        set
    }
}

impl From<Vec<Platform>> for PlatformSet {
    fn from(value: Vec<Platform>) -> Self {
        value.into_iter().collect()
    }
}

impl From<PlatformSet> for Vec<Platform> {
    fn from(value: PlatformSet) -> Self {
        value.0
    }
}

impl IntoIterator for PlatformSet {
    type Item = Platform;
    type IntoIter = std::vec::IntoIter<Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlatformSet {
    type Item = &'a Platform;
    type IntoIter = std::slice::Iter<'a, Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_is_lowercased() {
        assert_eq!(Platform::new("Steam").as_str(), "steam");
        assert_eq!(Platform::new("Xbox Live").as_str(), "xbox live");
        assert!(Platform::new("  ").is_blank());
        assert!(!Platform::new("psn").is_blank());
        assert!(Platform::new("UNIVERSAL").is_universal());
        assert!(Platform::new("Twitch").is_engagement_only());
        assert!(!Platform::new("psn").is_engagement_only());
    }

    #[test]
    fn test_platform_set_keeps_insertion_order() {
        let set: PlatformSet = ["steam", "epic", "STEAM", "psn"]
            .into_iter()
            .map(Platform::from)
            .collect();

        let ids: Vec<&str> = set.iter().map(Platform::as_str).collect();
        assert_eq!(ids, vec!["steam", "epic", "psn"]);
    }

    #[test]
    fn test_platform_set_intersection() {
        let listed: PlatformSet = ["psn", "epic", "stadia"].into_iter().map(Platform::from).collect();
        let owned: PlatformSet = ["steam", "epic", "psn"].into_iter().map(Platform::from).collect();

        let ids: Vec<String> = listed.intersection(&owned).iter().map(|p| p.to_string()).collect();
        assert_eq!(ids, vec!["psn", "epic"]);
    }

    #[test]
    fn test_platform_set_deserialize_normalizes() {
        let set: PlatformSet = serde_json::from_str(r#"["Epic", "epic", "XboxLive"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Platform::new("xboxlive")));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["epic","xboxlive"]"#);
    }
}
