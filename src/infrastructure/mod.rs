//! 基础设施层：外部系统交互
//!
//! 提供与厂商 API、公开码目录、本地兑换记录文件和日志系统的交互能力

pub mod catalog;
pub mod http;
pub mod logger;
pub mod session;
pub mod store;
pub mod vendor;
