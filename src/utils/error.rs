//! 路由内核错误类型定义
//!
//! 本模块定义了路由内核中使用的所有错误类型。

use thiserror::Error;

/// 路由内核错误类型
#[derive(Error, Debug)]
pub enum RouterError {
    // ==================== 路由表错误 ====================

    /// 路由模式无效
    #[error("路由模式无效: '{pattern}' - {reason}")]
    InvalidPattern {
        /// 出错的模式
        pattern: String,
        /// 失败原因
        reason: String,
    },

    /// 片段没有匹配的路由（仅在移除兜底路由后可达）
    #[error("片段没有匹配的路由: '{0}'")]
    NoRouteMatched(String),

    /// 解析器未注册
    #[error("解析器未注册: '{0}'")]
    UnknownResolution(String),

    /// 调用方解析器执行失败
    #[error("解析器执行失败: {0}")]
    Resolution(#[from] anyhow::Error),

    // ==================== 配置错误 ====================

    /// 配置加载失败
    #[error("配置加载失败: {0}")]
    ConfigLoadFailed(String),

    /// 配置值无效
    #[error("配置值无效: '{key}' - {reason}")]
    InvalidConfigValue {
        key: String,
        reason: String,
    },

    // ==================== 事件系统错误 ====================

    /// 订阅未找到
    #[error("订阅未找到: '{0}'")]
    SubscriptionNotFound(String),

    // ==================== IO 和序列化错误 ====================

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 序列化/反序列化错误
    #[error("YAML 错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== 通用错误 ====================

    /// 初始化失败
    #[error("初始化失败: {0}")]
    InitFailed(String),
}

/// 路由操作结果类型别名
pub type Result<T> = std::result::Result<T, RouterError>;

/// 错误码常量
pub mod error_code {
    // 路由错误 (ROUTE-xxx)
    pub const ROUTE_INVALID_PATTERN: &str = "ROUTE-001";
    pub const ROUTE_NOT_MATCHED: &str = "ROUTE-002";
    pub const ROUTE_UNKNOWN_RESOLUTION: &str = "ROUTE-003";
    pub const ROUTE_RESOLUTION_FAILED: &str = "ROUTE-004";

    // 配置错误 (CONFIG-xxx)
    pub const CONFIG_LOAD_FAILED: &str = "CONFIG-001";
    pub const CONFIG_INVALID_VALUE: &str = "CONFIG-002";

    // 事件错误 (EVENT-xxx)
    pub const EVENT_SUBSCRIPTION_NOT_FOUND: &str = "EVENT-001";

    // 其他
    pub const IO_ERROR: &str = "IO-001";
    pub const SERDE_ERROR: &str = "SERDE-001";
    pub const INIT_FAILED: &str = "INIT-001";
}

impl RouterError {
    /// 获取错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            RouterError::InvalidPattern { .. } => error_code::ROUTE_INVALID_PATTERN,
            RouterError::NoRouteMatched(_) => error_code::ROUTE_NOT_MATCHED,
            RouterError::UnknownResolution(_) => error_code::ROUTE_UNKNOWN_RESOLUTION,
            RouterError::Resolution(_) => error_code::ROUTE_RESOLUTION_FAILED,
            RouterError::ConfigLoadFailed(_) => error_code::CONFIG_LOAD_FAILED,
            RouterError::InvalidConfigValue { .. } => error_code::CONFIG_INVALID_VALUE,
            RouterError::SubscriptionNotFound(_) => error_code::EVENT_SUBSCRIPTION_NOT_FOUND,
            RouterError::Io(_) => error_code::IO_ERROR,
            RouterError::Json(_) | RouterError::Yaml(_) => error_code::SERDE_ERROR,
            RouterError::InitFailed(_) => error_code::INIT_FAILED,
        }
    }

    /// 构造模式错误的便捷方法
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
