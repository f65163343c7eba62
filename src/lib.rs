//! 反爬拦截识别 (Anti-bot Block Detection)
//!
//! 对单次 HTTP 抓取 (状态码 + 响应体) 判定是“被反爬拦截”还是“正常内容”。

pub mod core;
pub mod detector;
pub mod interfaces;
pub mod utils;

pub use crate::core::error::{AntibotError, Result};
pub use crate::core::model::{FetchOutcome, Tier, Verdict};
pub use crate::detector::{AntibotDetector, classify, is_blocked};
pub use crate::interfaces::BlockDetector;
