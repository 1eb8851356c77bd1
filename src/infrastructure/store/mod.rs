//! 存储实现

pub mod json_file;

pub use json_file::{history_key, JsonFileHistoryStore};
