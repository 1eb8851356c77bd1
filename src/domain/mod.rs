//! Domain Layer
//!
//! SHIFT 码、平台、兑换记录与兑换结果的定义

pub mod code;
pub mod history;
pub mod outcome;
pub mod platform;

pub use code::{normalize_code, ShiftCode};
pub use history::RedemptionHistory;
pub use outcome::RedemptionOutcome;
pub use platform::{Platform, PlatformSet, UNIVERSAL_PLATFORM};
