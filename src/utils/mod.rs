//! 通用辅助工具集 (General Utilities)
//!
//! 提供按字符计数的文本窗口切片与响应体读取。

use std::io::Read;
use std::path::Path;

/// 标准输入占位符
pub const STDIN_SOURCE: &str = "-";

/// 字符数 (Unicode scalar values)，最多数到 `cap` 为止
pub fn char_len_capped(s: &str, cap: usize) -> usize {
    s.chars().take(cap).count()
}

/// 取前 `max_chars` 个字符组成的切片，不会截断多字节字符
pub fn leading_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// 读取响应体：`-` 表示标准输入，其余视为文件路径。非 UTF-8 字节按有损方式解码。
pub fn load_body(source: &str) -> std::io::Result<String> {
    let mut raw = Vec::new();
    if source == STDIN_SOURCE {
        std::io::stdin().lock().read_to_end(&mut raw)?;
    } else {
        raw = std::fs::read(Path::new(source))?;
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
