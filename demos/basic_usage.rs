//! 基本使用示例
//!
//! 本示例展示了片段路由的基本使用方法，包括：
//!
//! - 创建路由器并注册调用方路由
//! - 订阅派发事件
//! - 离开确认：提示、取消、确认
//! - 导航与后退
//!
//! # 运行示例
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;

use chips_router::router::{
    Event, GateOutcome, NavigateOptions, RecordingConfirmDialog, RecordingNavigator,
};
use chips_router::{DispatchRecord, Logger, LoggerConfig, RouteDefinition, Router, RouterConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = Logger::try_init(LoggerConfig::builder().level("info").build());

    println!("=== 片段路由基本使用示例 ===\n");

    // 1. 配置与创建路由器
    let config = RouterConfig::builder()
        .confirm_prompt("放弃未保存的修改？", "放弃", "留下")
        .route(
            RouteDefinition::new("Reports/:report")
                .param("controller", "Report")
                .param("action", "show"),
        )
        .build();

    let navigator = RecordingNavigator::new();
    let dialog = RecordingConfirmDialog::new();
    let mut router = Router::builder()
        .config(config)
        .navigator(navigator.clone())
        .confirm_dialog(dialog.clone())
        .build()?;

    router.subscribe(
        "routed",
        Arc::new(|event: &Event| {
            if let Some(record) = DispatchRecord::from_event(event) {
                println!("  routed: {:?} / {:?} {}", record.controller, record.action, record.options);
            }
        }),
    );

    // 2. 执行若干片段
    println!("[1] 执行片段");
    for fragment in [
        "#Account/view/123",
        "#Account/view/123/tab=stream&expanded",
        "#Reports/sales",
        "#clearCache",
    ] {
        router.execute(fragment)?;
    }
    println!("  当前地址: {}\n", router.get_current_url());

    // 3. 离开确认
    println!("[2] 离开确认");
    router.execute("#Lead/edit/9")?;
    router.set_confirm_required(true);
    if let Some(warning) = router.leave_warning() {
        println!("  卸载提示: {}", warning);
    }

    if router.execute("#Contact")? == GateOutcome::AwaitingConfirm {
        let prompt = dialog.last().ok_or("确认提示未展示")?;
        println!("  提示: {} [{}/{}]", prompt.message, prompt.confirm_text, prompt.cancel_text);
    }
    router.cancel_pending()?;
    if let Some(call) = navigator.last() {
        println!("  取消后静默回到: #{}", call.fragment);
    }

    router.execute("#Contact")?;
    router.confirm_pending()?;
    println!("  确认后当前地址: {}\n", router.get_current_url());

    // 4. 导航与后退
    println!("[3] 导航与后退");
    router.navigate("Opportunity", NavigateOptions::trigger())?;
    router.navigate_back(NavigateOptions::trigger())?;
    println!("  历史: {:?}", router.history().entries());
    println!("  最近派发: {:?}", router.get_last());

    println!("\n统计: {}", serde_json::to_string_pretty(&router.stats())?);
    println!("\n=== 示例结束 ===");
    Ok(())
}
