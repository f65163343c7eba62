//! 内容形态识别 (Content Shape)
//!
//! 区分结构化数据 (JSON/XML/片段) 与 HTML 文档，避免把 API 的短 403 报错误判为拦截页。

const DATA_OPENERS: [char; 3] = ['{', '[', '<'];
const DOCUMENT_OPENERS: [&str; 2] = ["<html", "<!"];

/// 响应体是否像结构化数据载荷
pub fn looks_like_data(body: &str) -> bool {
    let stripped = body.trim();
    let Some(first) = stripped.chars().next() else {
        return false;
    };
    if !DATA_OPENERS.contains(&first) {
        return false;
    }
    !DOCUMENT_OPENERS.iter().any(|opener| starts_with_ignore_case(stripped, opener))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
