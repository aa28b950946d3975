//! 日志系统与导航统计集成测试

use chips_router::router::NavigateOptions;
use chips_router::utils::metrics::{NavigationStats, NavigationStatsSnapshot, StatKind};
use chips_router::{LogConfig, Logger, LoggerConfig, RotationStrategy, Router};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

// ============================================================================
// 导航统计测试
// ============================================================================

/// 测试路由器在完整流程中累计的统计
#[test]
fn test_router_stats_full_flow() {
    let mut router = Router::with_defaults().unwrap();

    router.execute("Account").unwrap();
    router.execute("Account/view/1").unwrap();
    router.set_confirm_required(true);
    router.execute("Lead").unwrap();
    router.execute("Contact").unwrap();
    router.confirm_pending().unwrap();
    router.navigate("Account", NavigateOptions::silent()).unwrap();

    let stats = router.stats();
    assert_eq!(stats.routes_triggered, 4);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.confirm_prompts, 1);
    assert_eq!(stats.reentrant_blocks, 1);
    // 重入强制后退一次，显式导航一次
    assert_eq!(stats.navigations, 2);

    router.reset_stats();
    assert_eq!(router.stats(), NavigationStatsSnapshot::default());
}

/// 测试多线程并发计数
#[test]
fn test_stats_concurrent_record() {
    let stats = Arc::new(NavigationStats::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..250 {
                    stats.record(StatKind::Dispatched);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(stats.snapshot().dispatched, 1000);
}

#[test]
fn test_stats_snapshot_json() {
    let mut router = Router::with_defaults().unwrap();
    router.execute("clearCache").unwrap();

    let json = serde_json::to_value(router.stats()).unwrap();
    assert_eq!(json["routes_triggered"], 1);
    assert_eq!(json["dispatched"], 1);
}

// ============================================================================
// 日志系统测试
// ============================================================================

#[test]
fn test_logger_config_from_router_config() {
    let temp_dir = TempDir::new().unwrap();
    let log_config = LogConfig {
        level: "debug".to_string(),
        json_format: true,
        file_output: true,
        log_dir: Some(temp_dir.path().to_path_buf()),
        rotation: "hourly".to_string(),
    };

    let config = LoggerConfig::from_log_config(&log_config);
    assert_eq!(config.level, "debug");
    assert!(config.json_format);
    assert_eq!(config.file_output.as_deref(), Some(temp_dir.path()));
    assert_eq!(config.rotation, RotationStrategy::Hourly);
}

/// 全局订阅者只能初始化一次，`try_init` 在重复初始化时不报错
#[test]
fn test_logger_try_init_is_idempotent() {
    let config = LoggerConfig::builder()
        .level("warn")
        .console_output(false)
        .build();
    let _first = Logger::try_init(config.clone());
    let second = Logger::try_init(config);
    assert!(!second.is_active());

    let mut router = Router::with_defaults().unwrap();
    assert!(router.execute("Account").is_ok());
}
