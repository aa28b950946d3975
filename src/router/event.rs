//! 路由事件数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::generate_uuid;

/// 事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 事件唯一标识
    pub event_id: String,

    /// 事件类型（如 `routed`、`route.view`、`history.back`）
    pub event_type: String,

    /// 事件数据
    #[serde(default)]
    pub data: Value,

    /// 事件时间戳
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// 创建新事件
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_id: generate_uuid(),
            event_type: event_type.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// 按类型模式匹配：`*` 匹配全部，`prefix.*` 匹配前缀，其余精确匹配
    pub fn matches_pattern(pattern: &str, event_type: &str) -> bool {
        if pattern == "*" {
            return true;
        }

        if let Some(prefix) = pattern.strip_suffix('*') {
            return prefix.ends_with('.')
                && event_type.starts_with(prefix)
                && event_type.len() > prefix.len();
        }

        pattern == event_type
    }
}

/// 路由器发出的事件类型
pub mod router_events {
    /// 派发完成，数据为 `{controller, action, options}`
    pub const ROUTED: &str = "routed";
    /// 路由触发，数据为 `{name, args}`
    pub const ROUTE: &str = "route";
    /// 按解析器名称区分的路由触发前缀
    pub const ROUTE_PREFIX: &str = "route.";
    /// 识别到浏览器后退
    pub const HISTORY_BACK: &str = "history.back";
    /// 识别到浏览器前进
    pub const HISTORY_FORWARD: &str = "history.forward";

    /// `route.<resolution>` 事件类型
    pub fn route_named(resolution: &str) -> String {
        format!("{}{}", ROUTE_PREFIX, resolution)
    }
}
