//! 对账引擎测试

mod common;

use common::{history, platforms, ScriptedRedeemer};
use shift_autoredeem::{
    Candidate, ReconcileEngine, RedemptionHistory, RedemptionOutcome, ShiftCode,
};

fn pairs(candidates: &[(&str, &str)]) -> Vec<(String, String)> {
    candidates
        .iter()
        .map(|(c, p)| (c.to_string(), p.to_string()))
        .collect()
}

#[tokio::test]
async fn test_end_to_end_candidate_order_and_history() {
    let codes = vec![
        ShiftCode::universal("ABCDE"),
        ShiftCode::for_platforms("FGHIJ", ["epic"]),
    ];
    let owned = platforms(&["steam", "epic"]);
    let redeemer = ScriptedRedeemer::new();

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert!(result.attempted);
    assert_eq!(
        redeemer.calls(),
        pairs(&[("ABCDE", "steam"), ("ABCDE", "epic"), ("FGHIJ", "epic")])
    );
    assert_eq!(
        result.history,
        history(&[("ABCDE", &["steam", "epic"]), ("FGHIJ", &["epic"])])
    );
    assert_eq!(result.redeemed_count(), 3);
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let codes = vec![
        ShiftCode::universal("ABCDE"),
        ShiftCode::for_platforms("FGHIJ", ["epic"]),
    ];
    let owned = platforms(&["steam", "epic"]);

    let first = ScriptedRedeemer::new();
    let first_result = ReconcileEngine::new(&first)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    let second = ScriptedRedeemer::new();
    let second_result = ReconcileEngine::new(&second)
        .reconcile(&codes, &owned, first_result.history.clone())
        .await;

    assert!(!second_result.attempted);
    assert_eq!(second.call_count(), 0);
    assert_eq!(second_result.history, first_result.history);
    assert_eq!(second_result.skipped.len(), 3);
}

#[tokio::test]
async fn test_universal_code_ignores_listed_platforms() {
    let mut code = ShiftCode::universal("ABCDE");
    code.platforms = platforms(&["stadia", "psn"]);
    let owned = platforms(&["a", "b"]);
    let redeemer = ScriptedRedeemer::new();

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&[code], &owned, RedemptionHistory::new())
        .await;

    assert_eq!(redeemer.calls(), pairs(&[("ABCDE", "a"), ("ABCDE", "b")]));
    assert_eq!(result.attempts.len(), 2);
}

#[tokio::test]
async fn test_unowned_platform_produces_no_candidate() {
    let codes = vec![ShiftCode::for_platforms("FGHIJ", ["c"])];
    let owned = platforms(&["a", "b"]);
    let redeemer = ScriptedRedeemer::new();

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert!(!result.attempted);
    assert_eq!(redeemer.call_count(), 0);
    assert!(result.history.is_empty());
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn test_already_redeemed_is_recorded_and_not_retried() {
    let codes = vec![ShiftCode::for_platforms("ABCDE", ["steam"])];
    let owned = platforms(&["steam"]);
    let redeemer =
        ScriptedRedeemer::new().fail_with("ABCDE", "steam", "Code already redeemed on this platform");

    let first = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert!(first.attempted);
    assert_eq!(first.attempts[0].outcome, RedemptionOutcome::AlreadyRedeemed);
    assert_eq!(first.history, history(&[("ABCDE", &["steam"])]));

    let second = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, first.history)
        .await;

    assert!(!second.attempted);
    assert_eq!(redeemer.call_count(), 1);
}

#[tokio::test]
async fn test_genuine_failure_keeps_pair_eligible() {
    let codes = vec![ShiftCode::for_platforms("ABCDE", ["steam"])];
    let owned = platforms(&["steam"]);
    let redeemer = ScriptedRedeemer::new().fail_with("ABCDE", "steam", "platform offline");

    let first = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert!(first.attempted);
    assert_eq!(
        first.attempts[0].outcome,
        RedemptionOutcome::Failed("platform offline".to_string())
    );
    assert!(first.history.is_empty());
    assert_eq!(first.failed_count(), 1);

    let second = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, first.history)
        .await;

    assert!(second.attempted);
    assert_eq!(
        second.attempts[0].candidate,
        Candidate::new("ABCDE", "steam")
    );
    assert_eq!(redeemer.call_count(), 2);
}

#[tokio::test]
async fn test_failure_does_not_abort_remaining_pairs() {
    let codes = vec![
        ShiftCode::universal("ABCDE"),
        ShiftCode::for_platforms("FGHIJ", ["epic"]),
    ];
    let owned = platforms(&["steam", "epic"]);
    let redeemer = ScriptedRedeemer::new().fail_with("ABCDE", "steam", "platform offline");

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert_eq!(redeemer.call_count(), 3);
    assert_eq!(
        result.history,
        history(&[("ABCDE", &["epic"]), ("FGHIJ", &["epic"])])
    );
}

#[tokio::test]
async fn test_repeated_catalog_entry_is_tried_once_per_run() {
    let codes = vec![ShiftCode::universal("ABCDE"), ShiftCode::universal("ABCDE")];
    let owned = platforms(&["steam", "epic"]);
    let redeemer = ScriptedRedeemer::new().fail_with("ABCDE", "steam", "platform offline");

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, RedemptionHistory::new())
        .await;

    assert_eq!(redeemer.calls(), pairs(&[("ABCDE", "steam"), ("ABCDE", "epic")]));
    assert_eq!(result.attempts.len(), 2);
    // 第一次成功的 epic 不会被重复条目当作"已在记录中"
    assert!(result.skipped.is_empty());
    assert_eq!(result.history, history(&[("ABCDE", &["epic"])]));
}

#[tokio::test]
async fn test_repeated_entry_after_history_hit_is_skipped_once() {
    let codes = vec![
        ShiftCode::for_platforms("ABCDE", ["steam"]),
        ShiftCode::universal("ABCDE"),
    ];
    let owned = platforms(&["steam"]);
    let redeemer = ScriptedRedeemer::new();

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, history(&[("ABCDE", &["steam"])]))
        .await;

    assert_eq!(redeemer.call_count(), 0);
    assert_eq!(result.skipped, vec![Candidate::new("ABCDE", "steam")]);
}

#[tokio::test]
async fn test_existing_history_entries_are_kept() {
    let codes = vec![ShiftCode::for_platforms("NEWCODE", ["steam"])];
    let owned = platforms(&["steam"]);
    let redeemer = ScriptedRedeemer::new();
    let previous = history(&[("OLDCODE", &["psn", "xboxlive"])]);

    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&codes, &owned, previous)
        .await;

    assert_eq!(
        result.history,
        history(&[("OLDCODE", &["psn", "xboxlive"]), ("NEWCODE", &["steam"])])
    );
}

#[tokio::test]
async fn test_no_codes_means_nothing_attempted() {
    let redeemer = ScriptedRedeemer::new();
    let result = ReconcileEngine::new(&redeemer)
        .reconcile(&[], &platforms(&["steam"]), RedemptionHistory::new())
        .await;

    assert!(!result.attempted);
    assert!(result.attempts.is_empty());
}
