//! 工具模块
//!
//! 包含错误类型、ID 生成、日志系统与导航统计。

pub mod error;
pub mod id;
pub mod logger;
pub mod metrics;

// 重导出常用类型
pub use error::{error_code, Result, RouterError};
pub use id::{generate_id, generate_uuid, is_valid_id};
pub use logger::{fields, LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
pub use metrics::{NavigationStats, NavigationStatsSnapshot, StatKind};
