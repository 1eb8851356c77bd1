//! 核心层：对账引擎和协作方抽象
//!
//! 包含兑换对账逻辑、外部协作方接口和兑换记录存储抽象

pub mod provider;
pub mod reconcile;
pub mod store;
