//! # Chips Router - 薯片片段路由
//!
//! 与界面框架无关的客户端片段路由与导航派发引擎，提供以下核心功能：
//!
//! - **有序路由表**: 内置路由与调用方路由按 `order` 排序匹配
//! - **派发器**: 把命中的路由规范化为 `{controller, action, options}` 派发记录
//! - **导航历史**: 独立于平台历史的只增栈，支持"导航后退"
//! - **前进/后退识别**: 可替换的识别策略，区分用户后退与程序导航
//! - **离开确认闸门**: 未保存编辑时拦截导航，支持确认、取消回退与重入保护
//! - **事件总线**: `routed`、`route`、`history.back` 等事件的同步分发
//! - **配置与日志**: YAML/JSON 配置加载与结构化日志
//!
//! ## 快速开始
//!
//! ```rust
//! use chips_router::{NavigateOptions, Router};
//!
//! let mut router = Router::with_defaults().unwrap();
//!
//! let record = router.execute("#Account/view/123").unwrap().completed().unwrap();
//! assert_eq!(record.controller.as_deref(), Some("Account"));
//! assert_eq!(record.action.as_deref(), Some("view"));
//!
//! router.navigate("Account", NavigateOptions::silent()).unwrap();
//! assert_eq!(router.get_current_url(), "#Account");
//! ```
//!
//! ## 模块结构
//!
//! - `router` - 路由系统相关类型
//! - `utils` - 错误类型、日志与统计
//! - `core` - 配置

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod core;
pub mod router;
pub mod utils;

// 重导出常用类型，方便使用
pub use router::{
    ConfirmDialog, ConfirmPrompt, DispatchRecord, Event, GateOutcome, GateState, NavigateOptions,
    Navigator, RouteMatch, RouteTable, Router, RouterBuilder,
};

pub use utils::{error_code, generate_id, generate_uuid, Result, RouterError};
pub use utils::logger::{fields, LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};

pub use core::config::{
    ConfirmConfig, DetectorKind, LogConfig, RouteDefinition, RouterConfig, RouterConfigBuilder,
};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
