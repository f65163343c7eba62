//! 配置管理系统 (Configuration Management)
//!
//! 负责 `antibot.toml` 的反序列化，支持 `ANTIBOT_*` 环境变量覆盖与默认值回退机制。
//! 判定阈值与特征库是进程级常量，不在此处暴露。

use std::path::Path;

use bon::Builder;
use config::{Config, Environment, File};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::core::error::{AntibotError, Result};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "antibot.toml";

/// 全局应用配置
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct AppConfig {
    /// 日志过滤级别 (未设置 `RUST_LOG` 时生效)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 判定结果输出参数
    #[serde(default)]
    pub output: OutputConfig,
}

/// 输出参数
#[derive(Debug, Deserialize, Builder, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// 存在被拦截的输入时以非零退出码结束
    #[serde(default)]
    pub fail_on_block: bool,
}

/// 输出格式
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// 从工作目录加载 `antibot.toml` (可缺省)
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// 从指定路径加载；显式路径不存在时报错，缺省路径不存在时回退默认值
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder();

        let builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder.add_source(File::from(default_path))
                } else {
                    builder
                }
            }
        };

        let builder = builder.add_source(
            Environment::with_prefix("ANTIBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(AntibotError::Config)?;
        settings.try_deserialize().map_err(AntibotError::Config)
    }
}
