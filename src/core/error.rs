//! 错误处理体系 (Error Handling System)
//!
//! 判定引擎本身不会失败；这里的错误只来自外围：配置加载、响应体读取、输出序列化与命令行输入。

use thiserror::Error;

/// 全局错误定义 (Antibot Errors)
#[derive(Error, Debug)]
pub enum AntibotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 状态码无法解析为 HTTP 数值
    #[error("Invalid status code: {0:?}")]
    InvalidStatus(String),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, AntibotError>;

impl AntibotError {
    /// 进程退出码映射
    pub fn exit_code(&self) -> i32 {
        match self {
            AntibotError::InvalidStatus(_) => 64,
            AntibotError::Config(_) => 78,
            AntibotError::Io(_) => 74,
            AntibotError::Serialization(_) => 70,
        }
    }
}

/// 解析命令行传入的状态码
pub fn parse_status(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| AntibotError::InvalidStatus(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_codes() {
        assert_eq!(parse_status("403").unwrap(), 403);
        assert_eq!(parse_status(" 429 ").unwrap(), 429);
        assert_eq!(parse_status("999").unwrap(), 999);
    }

    #[test]
    fn rejects_non_numeric_codes() {
        let err = parse_status("forbidden").unwrap_err();
        assert!(matches!(err, AntibotError::InvalidStatus(ref s) if s == "forbidden"));
        assert_eq!(err.exit_code(), 64);
        assert!(parse_status("-1").is_err());
        assert!(parse_status("70000").is_err());
    }
}
