//! 反爬拦截判定 (Anti-bot Block Detection)
//!
//! 根据单次抓取的状态码与响应体判断是否被反爬防护拦截。分层判定：
//! - 高置信结构性标记在任意状态码、任意页面体积下单独生效；
//! - 通用措辞只在错误状态码且页面较小时生效；
//! - 状态码检查需要内容信号佐证。
//!
//! 判定无状态、无 I/O，可在任意线程并发调用。

pub mod patterns;
pub mod shape;

use tracing::{debug, trace};

use crate::core::model::{FetchOutcome, Verdict};
use crate::interfaces::detector::BlockDetector;
use crate::utils::{char_len_capped, leading_chars};

pub use patterns::{Signature, corroborated, first_match, high_confidence, signatures};
pub use shape::looks_like_data;

/// 特征扫描窗口 (字符数)，仅取响应体开头
pub const SNIPPET_WINDOW: usize = 15_000;
/// 403 + 小页面 视为拦截的体积上限
pub const BLOCK_PAGE_MAX_SIZE: usize = 5_000;
/// 通用措辞生效的体积上限
pub const CORROBORATED_MAX_SIZE: usize = 10_000;
/// 近空响应阈值
pub const EMPTY_CONTENT_THRESHOLD: usize = 100;

/// 判定入口
///
/// `_error_message` 目前不参与判定，保留给后续信号源。
pub fn is_blocked(
    status_code: Option<u16>,
    body: Option<&str>,
    _error_message: Option<&str>,
) -> Verdict {
    let body = body.unwrap_or("");
    // 所有体积阈值都不超过 CORROBORATED_MAX_SIZE，计数到此为止即可
    let body_len = char_len_capped(body, CORROBORATED_MAX_SIZE);
    let verdict = decide(status_code, body, body_len);

    if verdict.blocked {
        debug!(
            status = ?status_code,
            body_len,
            reason = %verdict.reason,
            "检测到反爬拦截"
        );
    } else {
        trace!(status = ?status_code, body_len, "未检测到拦截");
    }
    verdict
}

/// 对抓取结果判定 (使用最终落地页状态码)
pub fn classify(outcome: &FetchOutcome) -> Verdict {
    is_blocked(
        outcome.effective_status(),
        Some(outcome.body.as_str()),
        outcome.error_message.as_deref(),
    )
}

fn decide(status_code: Option<u16>, body: &str, body_len: usize) -> Verdict {
    // 429 一律视为限流
    if status_code == Some(429) {
        return Verdict::blocked("HTTP 429 Too Many Requests");
    }

    let snippet = leading_chars(body, SNIPPET_WINDOW);
    if let Some(sig) = first_match(high_confidence(), snippet) {
        return Verdict::blocked(sig.label);
    }

    // API 返回的短 403 (JSON/XML) 是正常鉴权错误
    if status_code == Some(403) && body_len < BLOCK_PAGE_MAX_SIZE && !looks_like_data(body) {
        if body_len < EMPTY_CONTENT_THRESHOLD {
            return Verdict::blocked(format!(
                "HTTP 403 with near-empty response ({body_len} bytes)"
            ));
        }
        if let Some(sig) = first_match(corroborated(), snippet) {
            return Verdict::blocked(format!("{} (HTTP 403, {body_len} bytes)", sig.label));
        }
    }

    if let Some(code) = status_code
        && code >= 400
        && body_len < CORROBORATED_MAX_SIZE
        && let Some(sig) = first_match(corroborated(), snippet)
    {
        return Verdict::blocked(format!("{} (HTTP {code}, {body_len} bytes)", sig.label));
    }

    // 需要执行脚本的页面返回空壳
    if status_code == Some(200) {
        let stripped_len = char_len_capped(body.trim(), EMPTY_CONTENT_THRESHOLD);
        if stripped_len < EMPTY_CONTENT_THRESHOLD && !looks_like_data(body) {
            return Verdict::blocked(format!(
                "Near-empty content ({stripped_len} bytes) with HTTP 200"
            ));
        }
    }

    Verdict::pass()
}

/// 默认拦截检测器
#[derive(Debug, Default, Clone, Copy)]
pub struct AntibotDetector;

impl AntibotDetector {
    pub fn new() -> Self {
        Self
    }
}

impl BlockDetector for AntibotDetector {
    fn name(&self) -> &str {
        "antibot"
    }

    fn inspect(&self, outcome: &FetchOutcome) -> Verdict {
        classify(outcome)
    }
}
