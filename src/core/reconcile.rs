//! 兑换对账引擎
//!
//! 输入码目录、用户拥有的平台和历史兑换记录，找出需要兑换的 (code, platform)，
//! 逐个调用兑换客户端，并根据结果更新兑换记录。
//!
//! 执行严格串行：一次只处理一个 (code, platform)，顺序与目录顺序一致。
//! 同一次运行中每个 (code, platform) 至多尝试一次，目录重复列出的码不会重复兑换。

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::{Platform, PlatformSet, RedemptionHistory, RedemptionOutcome, ShiftCode};

use super::provider::Redeemer;

/// 一个候选兑换对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub code: String,
    pub platform: Platform,
}

impl Candidate {
    pub fn new(code: impl Into<String>, platform: impl Into<Platform>) -> Self {
        Self {
            code: code.into(),
            platform: platform.into(),
        }
    }
}

/// 一次兑换尝试及其结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub candidate: Candidate,
    pub outcome: RedemptionOutcome,
}

/// 对账结果
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// 更新后的兑换记录
    pub history: RedemptionHistory,
    /// 是否至少找到一个候选
    pub attempted: bool,
    /// 按执行顺序排列的兑换尝试
    pub attempts: Vec<Attempt>,
    /// 因已在记录中而跳过的兑换对
    pub skipped: Vec<Candidate>,
}

impl Reconciliation {
    /// 本次兑换成功的数量
    pub fn redeemed_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == RedemptionOutcome::Success)
            .count()
    }

    pub fn already_redeemed_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == RedemptionOutcome::AlreadyRedeemed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, RedemptionOutcome::Failed(_)))
            .count()
    }
}

/// 对账过程观察者
///
/// 用于向用户展示进度，默认实现什么也不做
pub trait ReconcileObserver: Send + Sync {
    /// 即将对候选发起兑换
    fn on_attempt(&self, _candidate: &Candidate) {}

    /// 兑换结束
    fn on_outcome(&self, _candidate: &Candidate, _outcome: &RedemptionOutcome) {}
}

/// 不做任何事的观察者
pub struct SilentObserver;

impl ReconcileObserver for SilentObserver {}

/// 对账引擎
pub struct ReconcileEngine<'a> {
    redeemer: &'a dyn Redeemer,
    observer: &'a dyn ReconcileObserver,
}

impl<'a> ReconcileEngine<'a> {
    pub fn new(redeemer: &'a dyn Redeemer) -> Self {
        Self {
            redeemer,
            observer: &SilentObserver,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn ReconcileObserver) -> Self {
        self.observer = observer;
        self
    }

    /// 执行对账
    ///
    /// 兑换成功或上游报告已兑换时记入 `history`；真正的失败不改动记录，下次运行会重试。
    /// 单个兑换对的失败不会中断整次对账。
    pub async fn reconcile(
        &self,
        codes: &[ShiftCode],
        owned: &PlatformSet,
        mut history: RedemptionHistory,
    ) -> Reconciliation {
        let mut attempts = Vec::new();
        let mut skipped = Vec::new();
        let mut seen: HashSet<(String, Platform)> = HashSet::new();

        for code in codes {
            for platform in code.effective_platforms(owned).iter() {
                if !seen.insert((code.code.clone(), platform.clone())) {
                    debug!(code = %code.code, platform = %platform, "duplicate catalog entry, ignoring");
                    continue;
                }

                let candidate = Candidate::new(code.code.clone(), platform.clone());

                if history.contains(&code.code, platform) {
                    debug!(code = %code.code, platform = %platform, "already in history, skipping");
                    skipped.push(candidate);
                    continue;
                }

                info!(code = %code.code, platform = %platform, "redeeming");
                self.observer.on_attempt(&candidate);
                let outcome = self.redeemer.redeem(&code.code, platform).await;
                self.observer.on_outcome(&candidate, &outcome);

                if outcome.is_redeemed() {
                    history.record(&code.code, platform.clone());
                } else if let RedemptionOutcome::Failed(reason) = &outcome {
                    warn!(code = %code.code, platform = %platform, %reason, "redemption failed");
                }

                attempts.push(Attempt { candidate, outcome });
            }
        }

        Reconciliation {
            history,
            attempted: !attempts.is_empty(),
            attempts,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct AlwaysSucceeds {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Redeemer for AlwaysSucceeds {
        async fn redeem(&self, code: &str, platform: &Platform) -> RedemptionOutcome {
            self.calls
                .lock()
                .unwrap()
                .push((code.to_string(), platform.to_string()));
            RedemptionOutcome::Success
        }
    }

    #[tokio::test]
    async fn test_skipped_pairs_are_reported_without_calls() {
        let redeemer = AlwaysSucceeds {
            calls: Mutex::new(Vec::new()),
        };
        let owned: PlatformSet = ["steam", "epic"].into_iter().map(Platform::from).collect();
        let mut history = RedemptionHistory::new();
        history.record("ABCDE", Platform::new("steam"));

        let result = ReconcileEngine::new(&redeemer)
            .reconcile(&[ShiftCode::universal("ABCDE")], &owned, history)
            .await;

        assert_eq!(result.skipped, vec![Candidate::new("ABCDE", "steam")]);
        assert_eq!(
            *redeemer.calls.lock().unwrap(),
            vec![("ABCDE".to_string(), "epic".to_string())]
        );
        assert_eq!(result.redeemed_count(), 1);
    }
}
