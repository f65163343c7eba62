//! 领域模型 (Domain Models)
//!
//! 单次抓取结果 (`FetchOutcome`) 与判定结论 (`Verdict`)。

use std::fmt;

use bon::Builder;
use serde::Serialize;
use strum::{Display, EnumIter};

/// 特征置信层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// 结构性标记，单独命中即可判定
    HighConfidence,
    /// 通用措辞，需配合状态码与页面体积佐证
    Corroborated,
}

/// 单次抓取的结果
///
/// 重定向链路下 `status_code` 记录首跳状态，`redirected_status_code` 记录最终落地页状态。
#[derive(Debug, Clone, Default, Builder)]
pub struct FetchOutcome {
    pub status_code: Option<u16>,
    pub redirected_status_code: Option<u16>,
    #[builder(default, into)]
    pub body: String,
    #[builder(into)]
    pub error_message: Option<String>,
}

impl FetchOutcome {
    pub fn new(status_code: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            ..Self::default()
        }
    }

    /// 参与判定的状态码：优先使用最终落地页状态
    pub fn effective_status(&self) -> Option<u16> {
        self.redirected_status_code.or(self.status_code)
    }

    /// 从 `http::Response` 构建 (响应体按有损 UTF-8 解码)
    pub fn from_http<B: AsRef<[u8]>>(resp: &http::Response<B>) -> Self {
        Self {
            status_code: Some(resp.status().as_u16()),
            body: String::from_utf8_lossy(resp.body().as_ref()).into_owned(),
            ..Self::default()
        }
    }
}

/// 判定结论
///
/// `reason` 为空当且仅当 `blocked == false`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub blocked: bool,
    pub reason: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            blocked: false,
            reason: String::new(),
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.is_empty() {
            "Blocked".to_string()
        } else {
            reason
        };
        Self {
            blocked: true,
            reason,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blocked {
            write!(f, "blocked: {}", self.reason)
        } else {
            write!(f, "not blocked")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_reason_tracks_blocked_flag() {
        let pass = Verdict::pass();
        assert!(!pass.is_blocked());
        assert!(pass.reason.is_empty());

        let hit = Verdict::blocked("Kasada challenge");
        assert!(hit.is_blocked());
        assert_eq!(hit.reason, "Kasada challenge");

        let unnamed = Verdict::blocked("");
        assert!(unnamed.is_blocked());
        assert!(!unnamed.reason.is_empty());
    }

    #[test]
    fn effective_status_prefers_final_hop() {
        let direct = FetchOutcome::new(Some(200), "");
        assert_eq!(direct.effective_status(), Some(200));

        let redirected = FetchOutcome::builder()
            .status_code(302)
            .redirected_status_code(403)
            .body("")
            .build();
        assert_eq!(redirected.effective_status(), Some(403));

        let unknown = FetchOutcome::default();
        assert_eq!(unknown.effective_status(), None);
    }

    #[test]
    fn from_http_copies_status_and_body() {
        let resp = http::Response::builder()
            .status(503)
            .body(b"<html>down</html>".to_vec())
            .unwrap();
        let outcome = FetchOutcome::from_http(&resp);
        assert_eq!(outcome.status_code, Some(503));
        assert_eq!(outcome.body, "<html>down</html>");
        assert!(outcome.redirected_status_code.is_none());
    }

    #[test]
    fn tier_serializes_snake_case() {
        assert_eq!(Tier::HighConfidence.to_string(), "high_confidence");
        assert_eq!(
            serde_json::to_string(&Tier::Corroborated).unwrap(),
            "\"corroborated\""
        );
    }
}
