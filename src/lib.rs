//! SHIFT 码自动兑换
//!
//! 登录厂商服务，从公开聚合站点获取当前可用的 SHIFT 码，
//! 按用户拥有的平台逐个兑换，并记住已经兑换过的 (code, platform)，下次运行时跳过。
//!
//! # 架构分层
//!
//! - `domain`: 领域模型（码、平台、兑换记录、兑换结果）
//! - `core`: 核心层，对账引擎和协作方抽象
//! - `infrastructure`: 基础设施层，HTTP 适配器、记录文件、日志
//! - `application`: 应用层，运行编排与进度输出

// 领域层
pub mod domain;

// 核心层
pub mod core;

// 基础设施层
pub mod infrastructure;

// 应用层
pub mod application;

pub mod config;
pub mod errors;

pub use application::{run, ConsoleReporter, Reporter, RunMode, RunSummary, Runner};
pub use config::AppConfig;
pub use core::provider::{CodeCatalog, PlatformResolver, Redeemer};
pub use core::reconcile::{Attempt, Candidate, ReconcileEngine, Reconciliation};
pub use core::store::{HistoryStore, MemoryHistoryStore};
pub use domain::{Platform, PlatformSet, RedemptionHistory, RedemptionOutcome, ShiftCode};
pub use errors::{Result, ShiftError};
