//! 应用程序入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、遥测层初始化，并对保存下来的响应体执行拦截判定。

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use antibot::core::config::{AppConfig, OutputFormat};
use antibot::core::error::{Result, parse_status};
use antibot::detector::signatures;
use antibot::utils::{STDIN_SOURCE, load_body};
use antibot::{AntibotDetector, BlockDetector, FetchOutcome, Tier};

/// 存在被拦截输入且开启 fail-on-block 时的退出码
const EXIT_BLOCKED: i32 = 2;

/// 命令行界面脚手架 (CLI Scaffolding)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 配置文件路径 (默认读取工作目录下的 antibot.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 判定响应体是否为反爬拦截页
    Check {
        /// 首跳 HTTP 状态码
        #[arg(short, long)]
        status: Option<String>,
        /// 重定向后最终落地页的 HTTP 状态码
        #[arg(short, long)]
        redirected_status: Option<String>,
        /// 输出格式 (text / json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// 任一输入被拦截时以退出码 2 结束
        #[arg(long)]
        fail_on_block: bool,
        /// 响应体文件，`-` 或留空表示标准输入
        files: Vec<String>,
    },
    /// 列出特征库
    Patterns {
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}

#[derive(Serialize)]
struct CheckReport<'a> {
    source: &'a str,
    status: Option<u16>,
    blocked: bool,
    reason: &'a str,
}

#[derive(Serialize)]
struct PatternReport<'a> {
    tier: Tier,
    label: &'a str,
    pattern: &'a str,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(Some(path)),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    // 遥测层初始化 (Telemetry Layer Initialization)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Check {
            status,
            redirected_status,
            format,
            fail_on_block,
            files,
        } => {
            let format = format.unwrap_or(config.output.format);
            let fail_on_block = fail_on_block || config.output.fail_on_block;
            run_check(status, redirected_status, format, &files).map(|any_blocked| {
                if fail_on_block && any_blocked {
                    EXIT_BLOCKED
                } else {
                    0
                }
            })
        }
        Commands::Patterns { format } => {
            run_patterns(format.unwrap_or(config.output.format)).map(|_| 0)
        }
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// 逐个判定输入，返回是否存在被拦截的输入
fn run_check(
    status: Option<String>,
    redirected_status: Option<String>,
    format: OutputFormat,
    files: &[String],
) -> Result<bool> {
    let status = status.as_deref().map(parse_status).transpose()?;
    let redirected_status = redirected_status.as_deref().map(parse_status).transpose()?;

    let sources: Vec<&str> = if files.is_empty() {
        vec![STDIN_SOURCE]
    } else {
        files.iter().map(String::as_str).collect()
    };

    let detector = AntibotDetector::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut any_blocked = false;

    for source in sources {
        let body = load_body(source)?;
        let outcome = FetchOutcome::builder()
            .maybe_status_code(status)
            .maybe_redirected_status_code(redirected_status)
            .body(body)
            .build();

        let verdict = detector.inspect(&outcome);
        tracing::debug!(source, detector = detector.name(), "判定完成");
        any_blocked |= verdict.blocked;

        match format {
            OutputFormat::Text if verdict.blocked => {
                writeln!(out, "BLOCKED {}: {}", source, verdict.reason)?
            }
            OutputFormat::Text => writeln!(out, "OK {}", source)?,
            OutputFormat::Json => {
                let report = CheckReport {
                    source,
                    status: outcome.effective_status(),
                    blocked: verdict.blocked,
                    reason: &verdict.reason,
                };
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            }
        }
    }

    Ok(any_blocked)
}

fn run_patterns(format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for tier in Tier::iter() {
        for sig in signatures(tier) {
            match format {
                OutputFormat::Text => writeln!(
                    out,
                    "{:<16} {:<45} {}",
                    tier.to_string(),
                    sig.label,
                    sig.pattern.as_str()
                )?,
                OutputFormat::Json => {
                    let report = PatternReport {
                        tier,
                        label: sig.label,
                        pattern: sig.pattern.as_str(),
                    };
                    writeln!(out, "{}", serde_json::to_string(&report)?)?;
                }
            }
        }
    }

    Ok(())
}
