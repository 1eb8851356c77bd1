//! 应用层：运行编排与进度输出

pub mod output;
pub mod runner;

pub use output::{ConsoleReporter, RecordingReporter, Reporter, ReporterObserver};
pub use runner::{run, Collaborators, RunMode, RunSummary, Runner};
