//! 核心模块
//!
//! 包含路由内核的配置。

pub mod config;

pub use config::{
    ConfirmConfig, DetectorKind, LogConfig, RouteDefinition, RouterConfig, RouterConfigBuilder,
};
