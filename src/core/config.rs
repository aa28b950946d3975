//! 路由配置
//!
//! 定义路由内核的配置结构和加载逻辑。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::utils::{Result, RouterError};

/// 离开确认提示文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmConfig {
    /// 提示消息
    #[serde(default = "default_confirm_message")]
    pub message: String,

    /// 确认按钮文本
    #[serde(default = "default_confirm_text")]
    pub confirm_text: String,

    /// 取消按钮文本
    #[serde(default = "default_cancel_text")]
    pub cancel_text: String,

    /// 是否显示遮罩
    #[serde(default = "default_true")]
    pub backdrop: bool,
}

fn default_confirm_message() -> String {
    "Are you sure?".to_string()
}

fn default_confirm_text() -> String {
    "Yes".to_string()
}

fn default_cancel_text() -> String {
    "No".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            message: default_confirm_message(),
            confirm_text: default_confirm_text(),
            cancel_text: default_cancel_text(),
            backdrop: true,
        }
    }
}

/// 前进/后退识别策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// 比较平台历史长度（默认）
    #[default]
    HistoryLength,
    /// 比较每个历史条目的状态令牌
    StateToken,
}

/// 调用方路由定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// 路由模式
    pub pattern: String,

    /// 解析器名称
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// 排序键，越小越优先
    #[serde(default)]
    pub order: i32,

    /// 路由参数（`defaultRoute` 使用其中的 controller / action）
    #[serde(default)]
    pub params: Map<String, Value>,
}

fn default_resolution() -> String {
    "defaultRoute".to_string()
}

impl RouteDefinition {
    /// 创建使用 `defaultRoute` 解析器的路由定义
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            resolution: default_resolution(),
            order: 0,
            params: Map::new(),
        }
    }

    /// 设置解析器
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// 设置排序键
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// 添加路由参数
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json_format: bool,

    /// 是否输出到文件
    #[serde(default)]
    pub file_output: bool,

    /// 日志文件目录
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// 日志轮转策略
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_output: false,
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// 路由内核配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// 配置文件路径
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// 离开确认提示
    #[serde(default)]
    pub confirm: ConfirmConfig,

    /// `backProcessed` 标记的存活时间（毫秒）
    #[serde(default = "default_back_window_ms")]
    pub back_window_ms: u64,

    /// 前进/后退识别策略
    #[serde(default)]
    pub detector: DetectorKind,

    /// 解析缓存容量，0 表示禁用
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// 启动时安装的调用方路由
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,

    /// 日志配置
    #[serde(default)]
    pub logging: LogConfig,
}

fn default_back_window_ms() -> u64 {
    50
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            confirm: ConfirmConfig::default(),
            back_window_ms: default_back_window_ms(),
            detector: DetectorKind::default(),
            cache_capacity: default_cache_capacity(),
            routes: Vec::new(),
            logging: LogConfig::default(),
        }
    }
}

impl RouterConfig {
    /// 创建配置构建器
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::new()
    }

    /// 从文件加载配置（`.json` 按 JSON 解析，其余按 YAML）
    pub async fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            RouterError::ConfigLoadFailed(format!("{}: {}", path.display(), e))
        })?;

        let mut config: RouterConfig = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<()> {
        for (i, route) in self.routes.iter().enumerate() {
            if route.resolution.trim().is_empty() {
                return Err(RouterError::InvalidConfigValue {
                    key: format!("routes[{}].resolution", i),
                    reason: format!("路由 '{}' 的解析器名称为空", route.pattern),
                });
            }
        }
        if self.confirm.message.is_empty() {
            return Err(RouterError::InvalidConfigValue {
                key: "confirm.message".to_string(),
                reason: "确认提示消息不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 合并另一个配置（仅覆盖非默认值，路由追加）
    pub fn merge(&mut self, other: RouterConfig) {
        if other.confirm != ConfirmConfig::default() {
            self.confirm = other.confirm;
        }
        if other.back_window_ms != default_back_window_ms() {
            self.back_window_ms = other.back_window_ms;
        }
        if other.detector != DetectorKind::default() {
            self.detector = other.detector;
        }
        if other.cache_capacity != default_cache_capacity() {
            self.cache_capacity = other.cache_capacity;
        }
        if other.logging.level != default_log_level() {
            self.logging.level = other.logging.level;
        }
        if other.logging.file_output {
            self.logging.file_output = true;
            self.logging.log_dir = other.logging.log_dir;
        }
        self.routes.extend(other.routes);
    }
}

/// 配置构建器
#[derive(Debug, Default)]
pub struct RouterConfigBuilder {
    config: RouterConfig,
}

impl RouterConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置离开确认提示
    pub fn confirm_prompt(
        mut self,
        message: impl Into<String>,
        confirm_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        self.config.confirm.message = message.into();
        self.config.confirm.confirm_text = confirm_text.into();
        self.config.confirm.cancel_text = cancel_text.into();
        self
    }

    /// 设置 `backProcessed` 窗口
    pub fn back_window_ms(mut self, ms: u64) -> Self {
        self.config.back_window_ms = ms;
        self
    }

    /// 设置识别策略
    pub fn detector(mut self, detector: DetectorKind) -> Self {
        self.config.detector = detector;
        self
    }

    /// 设置解析缓存容量
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// 添加调用方路由
    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.config.routes.push(route);
        self
    }

    /// 设置日志级别
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// 构建配置
    pub fn build(self) -> RouterConfig {
        self.config
    }
}
