//! Valentine - 终端宿主
//!
//! 读取指令行，驱动 valentine-runtime 并在终端显示结果。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use host::{App, AppConfig, drive};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;

/// 命令行参数（优先级高于配置文件）
#[derive(Debug, Parser)]
#[command(name = "valentine", version, about = "情人节小游戏（终端版）")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 输入脚本路径（默认从标准输入读取）
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 快进：不等待真实时间
    #[arg(short, long)]
    fast_forward: bool,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 把每条 Command 以 JSON 行输出
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut AppConfig) {
        if let Some(script) = &self.script {
            config.input_script = Some(script.clone());
        }
        if self.fast_forward {
            config.fast_forward = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.json {
            config.echo_commands = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("无法加载配置 {}", cli.config.display()))?;
    cli.apply(&mut config);
    config.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("无法创建 tokio 运行时")?;
    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    let reader: Box<dyn AsyncBufRead + Unpin> = match &config.input_script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("无法打开输入脚本 {}", path.display()))?;
            info!(path = %path.display(), "从输入脚本读取指令");
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut app = App::new(&config, std::io::stdout());
    app.open();
    drive(&mut app, reader, config.fast_forward)
        .await
        .context("读取输入失败")
}
