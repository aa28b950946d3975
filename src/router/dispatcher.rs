//! 派发器
//!
//! 把命中的路由交给对应名称的解析器，得到规范化的
//! `{controller, action, options}` 派发记录。
//!
//! 内置解析器：
//!
//! | 名称 | controller | action |
//! |------|-----------|--------|
//! | `view` / `edit` | 第 1 个参数 | `view` / `edit`，`id` 取第 2 个参数 |
//! | `create` | 第 1 个参数 | `create` |
//! | `action` | 第 1 个参数 | 第 2 个参数 |
//! | `defaultAction` | 第 1 个参数 | `null` |
//! | `home` | `Home` | `null` |
//! | `clearCache` | `null` | `clearCache` |
//! | `logout` | `null` | `logout`，随后静默导航到空片段 |
//! | `defaultRoute` | 路由参数或捕获的 `controller` | 路由参数或捕获的 `action` |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::event::Event;
use super::options::parse_options;
use super::platform::NavigateOptions;
use super::route_table::RouteMatch;
use crate::utils::{Result, RouterError};

/// 兜底路由派发的控制器
pub const HOME_CONTROLLER: &str = "Home";

/// 内置解析器名称
pub mod resolutions {
    /// 查看记录
    pub const VIEW: &str = "view";
    /// 编辑记录
    pub const EDIT: &str = "edit";
    /// 新建记录
    pub const CREATE: &str = "create";
    /// 控制器动作
    pub const ACTION: &str = "action";
    /// 控制器默认动作
    pub const DEFAULT_ACTION: &str = "defaultAction";
    /// 首页
    pub const HOME: &str = "home";
    /// 清除缓存
    pub const CLEAR_CACHE: &str = "clearCache";
    /// 登出
    pub const LOGOUT: &str = "logout";
    /// 调用方路由（控制器/动作来自参数或捕获）
    pub const DEFAULT_ROUTE: &str = "defaultRoute";
}

// ============================================================================
// 派发记录
// ============================================================================

/// 派发记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// 控制器
    pub controller: Option<String>,
    /// 动作
    pub action: Option<String>,
    /// 选项：通常为对象，不透明选项时为字符串
    #[serde(default = "empty_object")]
    pub options: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl DispatchRecord {
    /// 创建派发记录
    pub fn new(controller: Option<&str>, action: Option<&str>, options: Value) -> Self {
        Self {
            controller: controller.map(str::to_string),
            action: action.map(str::to_string),
            options,
        }
    }

    /// 创建不带选项的派发记录
    pub fn bare(controller: Option<&str>, action: Option<&str>) -> Self {
        Self::new(controller, action, empty_object())
    }

    /// 读取某个选项
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// 转换为事件数据
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "controller": self.controller,
            "action": self.action,
            "options": self.options,
        })
    }

    /// 从 `routed` 事件中还原派发记录
    pub fn from_event(event: &Event) -> Option<Self> {
        serde_json::from_value(event.data.clone()).ok()
    }
}

// ============================================================================
// 解析结果
// ============================================================================

/// 派发后的后续导航
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    /// 目标片段
    pub fragment: String,
    /// 导航选项
    pub options: NavigateOptions,
}

/// 解析器的输出
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// 要派发的记录
    pub record: DispatchRecord,
    /// 派发完成后的导航
    pub follow_up: Option<FollowUp>,
}

impl Resolved {
    /// 仅派发
    pub fn dispatch(record: DispatchRecord) -> Self {
        Self {
            record,
            follow_up: None,
        }
    }

    /// 派发后再导航到指定片段
    pub fn then_navigate(mut self, fragment: impl Into<String>, options: NavigateOptions) -> Self {
        self.follow_up = Some(FollowUp {
            fragment: fragment.into(),
            options,
        });
        self
    }
}

/// 解析器函数
///
/// 返回的错误不会被派发器吞掉，而是从 `execute` 原样传出。
pub type ResolutionFn = Arc<dyn Fn(&RouteMatch) -> anyhow::Result<Resolved> + Send + Sync>;

// ============================================================================
// 派发器
// ============================================================================

/// 解析器注册表
#[derive(Clone)]
pub struct Dispatcher {
    resolutions: HashMap<String, ResolutionFn>,
}

impl Dispatcher {
    /// 创建已安装内置解析器的派发器
    pub fn new() -> Self {
        let mut dispatcher = Self {
            resolutions: HashMap::new(),
        };
        dispatcher.register(resolutions::VIEW, |m| Ok(Resolved::dispatch(record_view(m, "view"))));
        dispatcher.register(resolutions::EDIT, |m| Ok(Resolved::dispatch(record_view(m, "edit"))));
        dispatcher.register(resolutions::CREATE, |m| {
            Ok(Resolved::dispatch(record(m.arg(0), "create", None, m.trailing_options(1))))
        });
        dispatcher.register(resolutions::ACTION, |m| {
            let options = parse_options(m.trailing_options(2)).into_value();
            Ok(Resolved::dispatch(DispatchRecord::new(m.arg(0), m.arg(1), options)))
        });
        dispatcher.register(resolutions::DEFAULT_ACTION, |m| {
            Ok(Resolved::dispatch(DispatchRecord::bare(m.arg(0), None)))
        });
        dispatcher.register(resolutions::HOME, |_| {
            Ok(Resolved::dispatch(DispatchRecord::bare(Some(HOME_CONTROLLER), None)))
        });
        dispatcher.register(resolutions::CLEAR_CACHE, |_| {
            Ok(Resolved::dispatch(DispatchRecord::bare(None, Some("clearCache"))))
        });
        dispatcher.register(resolutions::LOGOUT, |_| {
            Ok(Resolved::dispatch(DispatchRecord::bare(None, Some("logout")))
                .then_navigate("", NavigateOptions::silent()))
        });
        dispatcher.register(resolutions::DEFAULT_ROUTE, |m| {
            Ok(Resolved::dispatch(default_route(m)))
        });
        dispatcher
    }

    /// 注册或替换解析器
    pub fn register<F>(&mut self, name: impl Into<String>, resolution: F)
    where
        F: Fn(&RouteMatch) -> anyhow::Result<Resolved> + Send + Sync + 'static,
    {
        self.resolutions.insert(name.into(), Arc::new(resolution));
    }

    /// 是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.resolutions.contains_key(name)
    }

    /// 调用命中路由对应的解析器
    pub fn resolve(&self, matched: &RouteMatch) -> Result<Resolved> {
        let resolution = self
            .resolutions
            .get(&matched.resolution)
            .ok_or_else(|| RouterError::UnknownResolution(matched.resolution.clone()))?;
        Ok(resolution(matched)?)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn record_view(m: &RouteMatch, action: &str) -> DispatchRecord {
    record(m.arg(0), action, m.arg(1), m.trailing_options(2))
}

/// 记录类动作：解析选项后附上 `id`
fn record(
    controller: Option<&str>,
    action: &str,
    id: Option<&str>,
    raw_options: Option<&str>,
) -> DispatchRecord {
    let mut options = parse_options(raw_options).into_map();
    if let Some(id) = id {
        options.insert("id".to_string(), Value::String(id.to_string()));
    }
    DispatchRecord::new(controller, Some(action), Value::Object(options))
}

/// 调用方路由：选项来自 `:name` 捕获，路由参数作为缺省值补入
fn default_route(m: &RouteMatch) -> DispatchRecord {
    let mut options: Map<String, Value> = m
        .captures
        .iter()
        .filter(|c| !c.splat)
        .map(|c| (c.name.clone(), Value::String(c.value.clone())))
        .collect();

    let pick = |key: &str, options: &Map<String, Value>| {
        m.params
            .get(key)
            .or_else(|| options.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let controller = pick("controller", &options);
    let action = pick("action", &options);

    for (key, value) in &m.params {
        if key != "controller" && key != "action" && !options.contains_key(key) {
            options.insert(key.clone(), value.clone());
        }
    }

    DispatchRecord {
        controller,
        action,
        options: Value::Object(options),
    }
}
