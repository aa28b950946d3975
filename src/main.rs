//! Chips Router 命令行入口
//!
//! 片段路由的调试工具：查看路由表、解析单个片段、回放导航脚本。
//!
//! # 命令概览
//!
//! - `routes` - 查看路由表
//! - `resolve` - 解析并派发单个片段
//! - `replay` - 逐行回放导航脚本并打印事件
//! - `check-config` - 验证配置文件
//! - `version` - 显示版本信息
//!
//! # 回放脚本
//!
//! 每行一条指令，空行忽略：
//!
//! - `!` 切换"需要离开确认"
//! - `<` 导航后退并触发路由
//! - `y` / `n` 确认或取消等待中的提示
//! - 其余内容视为片段并执行
//!
//! # 使用示例
//!
//! ```bash
//! # 查看路由表
//! chips-router routes
//!
//! # 解析片段
//! chips-router resolve '#Account/view/123/tab=stream'
//!
//! # 从标准输入回放
//! printf 'Account\n!\nLead\nn\n' | chips-router replay -
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::info;

use chips_router::router::{ConfirmDialog, Event, GateOutcome, NavigateOptions, Navigator};
use chips_router::{ConfirmPrompt, DispatchRecord, Logger, LoggerConfig, Router, RouterConfig};

/// Chips Router - 薯片片段路由
///
/// 与界面框架无关的客户端片段路由与导航派发引擎。
#[derive(Parser)]
#[command(name = "chips-router")]
#[command(version, about = "薯片片段路由调试工具", long_about = None)]
#[command(author = "Chips Team")]
#[command(propagate_version = true)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "router.yaml", global = true)]
    config: PathBuf,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// 子命令
    #[command(subcommand)]
    command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
enum Commands {
    /// 查看路由表
    ///
    /// 按检查顺序列出内置路由与配置中的路由。
    Routes,

    /// 解析并派发单个片段
    Resolve {
        /// 片段，可带前导 `#`
        fragment: String,
    },

    /// 回放导航脚本
    ///
    /// 逐行执行脚本并打印路由事件。
    Replay {
        /// 脚本文件，`-` 表示标准输入
        input: String,
    },

    /// 验证配置文件
    CheckConfig,

    /// 查看版本信息
    Version,
}

// ============================================================================
// 控制台平台实现
// ============================================================================

/// 把导航调用打印到控制台
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&mut self, fragment: &str, options: NavigateOptions) {
        println!(
            "  → navigate #{} (trigger: {}, replace: {})",
            fragment, options.trigger, options.replace
        );
    }
}

/// 把确认提示打印到控制台
struct ConsoleConfirmDialog;

impl ConfirmDialog for ConsoleConfirmDialog {
    fn show(&mut self, prompt: &ConfirmPrompt) {
        println!(
            "  ? {} [{} = y / {} = n]",
            prompt.message, prompt.confirm_text, prompt.cancel_text
        );
    }
}

// ============================================================================
// 子命令
// ============================================================================

/// 加载配置文件，不存在时使用默认配置
async fn load_config(path: &Path) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        let config = RouterConfig::from_file(path).await?;
        info!("已加载配置文件: {}", path.display());
        Ok(config)
    } else {
        info!("配置文件不存在 ({})，使用默认配置", path.display());
        Ok(RouterConfig::default())
    }
}

fn build_router(config: RouterConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let mut router = Router::builder()
        .config(config)
        .navigator(ConsoleNavigator)
        .confirm_dialog(ConsoleConfirmDialog)
        .build()?;

    router.subscribe(
        "*",
        Arc::new(|event: &Event| {
            println!("  · {} {}", event.event_type, event.data);
        }),
    );
    Ok(router)
}

/// 显示路由表
fn show_routes(router: &Router) {
    println!();
    println!("路由表（按检查顺序）");
    println!("═══════════════════════════════════════");
    for entry in router.route_table().entries() {
        println!(
            "  {:>5}  {:<32} → {}",
            entry.order, entry.pattern, entry.resolution
        );
    }
    println!("═══════════════════════════════════════");
    println!();
}

fn print_record(record: &DispatchRecord) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&record.to_value())?);
    Ok(())
}

/// 解析并派发单个片段
fn resolve_fragment(router: &mut Router, fragment: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(matched) = router.resolve(fragment) {
        println!("命中: {} → {} (order {})", matched.pattern, matched.resolution, matched.order);
    }
    if let Some(record) = router.execute(fragment)?.completed() {
        print_record(&record)?;
    }
    Ok(())
}

/// 执行一行回放指令
fn replay_line(router: &mut Router, line: &str) -> Result<(), Box<dyn std::error::Error>> {
    match line {
        "!" => {
            let required = !router.confirm_required();
            router.set_confirm_required(required);
            println!("  confirm_required = {}", required);
        }
        "<" => {
            if !router.navigate_back(NavigateOptions::trigger())? {
                println!("  历史为空");
            }
        }
        "y" => match router.confirm_pending()? {
            Some(record) => print_record(&record)?,
            None => println!("  无待执行的动作"),
        },
        "n" => {
            if !router.cancel_pending()? {
                println!("  没有展示中的提示");
            }
        }
        fragment => match router.execute(fragment)? {
            GateOutcome::Completed(_) => {}
            GateOutcome::AwaitingConfirm => println!("  等待确认"),
            GateOutcome::Blocked => println!("  已拦截"),
        },
    }
    Ok(())
}

/// 回放导航脚本
async fn replay<R>(router: &mut Router, input: R) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("> {}", line);
        replay_line(router, line)?;
    }

    println!();
    println!("当前地址: {}", router.get_current_url());
    println!("统计: {}", serde_json::to_string(&router.stats())?);
    Ok(())
}

/// 检查配置文件
async fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("检查配置文件: {}", path.display());
    println!();

    match RouterConfig::from_file(path).await {
        Ok(config) => {
            println!("✅ 配置文件有效！");
            println!("────────────────────────────────────────");
            println!("  确认提示:     {}", config.confirm.message);
            println!("  后退窗口:     {} ms", config.back_window_ms);
            println!("  识别策略:     {:?}", config.detector);
            println!("  缓存容量:     {}", config.cache_capacity);
            println!("  调用方路由:   {}", config.routes.len());
            println!("  日志级别:     {}", config.logging.level);
            println!("────────────────────────────────────────");
            Ok(())
        }
        Err(e) => {
            println!("❌ 配置文件无效: {}", e);
            Err(Box::new(e))
        }
    }
}

/// 打印版本信息
fn print_version() {
    println!();
    println!("Chips Router - 薯片片段路由");
    println!("═══════════════════════════════════════");
    println!("  版本:     {}", chips_router::VERSION);
    println!("  目标平台: {}", std::env::consts::ARCH);
    println!("  操作系统: {}", std::env::consts::OS);
    println!("═══════════════════════════════════════");
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        print_version();
        return Ok(());
    }
    if matches!(cli.command, Commands::CheckConfig) {
        return check_config(&cli.config).await;
    }

    let config = load_config(&cli.config).await?;
    let mut logger_config = LoggerConfig::from_log_config(&config.logging);
    logger_config.level = cli.log_level.clone();
    let _guard = Logger::try_init(logger_config);

    let mut router = build_router(config)?;

    match cli.command {
        Commands::Routes => show_routes(&router),
        Commands::Resolve { fragment } => resolve_fragment(&mut router, &fragment)?,
        Commands::Replay { input } => {
            if input == "-" {
                replay(&mut router, tokio::io::stdin()).await?;
            } else {
                let file = tokio::fs::File::open(&input).await?;
                replay(&mut router, file).await?;
            }
        }
        Commands::CheckConfig | Commands::Version => {}
    }

    Ok(())
}
