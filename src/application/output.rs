//! 用户可见的进度输出
//!
//! 每个动作一行：先打印 `动作... `，动作结束后在同一行补上结果。

use std::io::Write;
use std::sync::Mutex;

use colored::Colorize;

use crate::core::reconcile::{Candidate, ReconcileObserver};
use crate::domain::RedemptionOutcome;

/// 进度输出 trait
pub trait Reporter: Send + Sync {
    /// 开始一个动作
    fn start(&self, action: &str);

    /// 动作成功
    fn success(&self) {
        self.success_msg("done!");
    }

    /// 动作成功，附带说明
    fn success_msg(&self, msg: &str);

    /// 动作失败
    fn failed(&self, msg: &str);

    /// 独立的一行提示
    fn info(&self, msg: &str);
}

/// 命令行输出，写到标准输出
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn start(&self, action: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}... ", action);
        let _ = stdout.flush();
    }

    fn success_msg(&self, msg: &str) {
        println!("{}", msg.green());
    }

    fn failed(&self, msg: &str) {
        println!("{}", msg.red());
    }

    fn info(&self, msg: &str) {
        println!("{}", msg);
    }
}

/// 记录输出内容的 Reporter，便于嵌入和测试
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
    pending: Mutex<Option<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已完成的输出行
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn finish(&self, result: &str) {
        let pending = self.pending.lock().ok().and_then(|mut p| p.take());
        let line = match pending {
            Some(action) => format!("{}... {}", action, result),
            None => result.to_string(),
        };
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Reporter for RecordingReporter {
    fn start(&self, action: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(action.to_string());
        }
    }

    fn success_msg(&self, msg: &str) {
        self.finish(msg);
    }

    fn failed(&self, msg: &str) {
        self.finish(msg);
    }

    fn info(&self, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(msg.to_string());
        }
    }
}

/// 把对账进度转成 Reporter 输出
pub struct ReporterObserver<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> ReporterObserver<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }
}

impl ReconcileObserver for ReporterObserver<'_> {
    fn on_attempt(&self, candidate: &Candidate) {
        self.reporter.start(&format!(
            "Trying \"{}\" SHIFT code \"{}\"",
            candidate.platform, candidate.code
        ));
    }

    fn on_outcome(&self, _candidate: &Candidate, outcome: &RedemptionOutcome) {
        match outcome {
            RedemptionOutcome::Success => self.reporter.success_msg("success!"),
            RedemptionOutcome::AlreadyRedeemed => self.reporter.success_msg("already redeemed"),
            RedemptionOutcome::Failed(reason) => self.reporter.failed(reason),
        }
    }
}
