//! 路由表数据结构
//!
//! 管理路由模式到解析器名称的有序映射。
//! 查找顺序：`order` 升序；`order` 相同时后注册的先检查。
//! 包含 LRU 缓存，任何路由变更都会清空缓存。

use lru::LruCache;
use serde::Serialize;
use serde_json::{Map, Value};
use std::num::NonZeroUsize;
use tracing::{debug, info};

use super::pattern::{Capture, RoutePattern};
use crate::utils::Result;

/// 默认缓存容量
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// 内置路由，按优先级从高到低排列
///
/// 带 `/:options` 的变体排在不带的前面，二者不会同时匹配。
pub const BUILTIN_ROUTES: &[(&str, &str, i32)] = &[
    ("clearCache", "clearCache", 0),
    (":controller/view/:id/:options", "view", 0),
    (":controller/view/:id", "view", 0),
    (":controller/edit/:id/:options", "edit", 0),
    (":controller/edit/:id", "edit", 0),
    (":controller/create", "create", 0),
    (":controller/:action/:options", "action", 100),
    (":controller/:action", "action", 200),
    (":controller", "defaultAction", 300),
    ("*actions", "home", 500),
];

// ============================================================================
// 路由条目
// ============================================================================

/// 路由条目
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    /// 路由模式
    pub pattern: String,

    /// 解析器名称
    pub resolution: String,

    /// 排序键（越小越优先）
    pub order: i32,

    /// 注册时提供的路由参数
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,

    /// 首次注册序号，重复注册不改变
    #[serde(skip)]
    seq: u64,
}

impl RouteEntry {
    /// 首次注册序号
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

struct CompiledRoute {
    entry: RouteEntry,
    pattern: RoutePattern,
}

/// 一次路由解析的结果
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// 命中的路由模式
    pub pattern: String,
    /// 解析器名称
    pub resolution: String,
    /// 排序键
    pub order: i32,
    /// 按顺序排列的捕获
    pub captures: Vec<Capture>,
    /// 片段中的查询串
    pub query: Option<String>,
    /// 路由参数
    pub params: Map<String, Value>,
}

impl RouteMatch {
    /// 第 `index` 个位置参数
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(|c| c.value.as_str())
    }

    /// 事件携带的位置参数：全部捕获值，末尾追加查询串（没有时为 `None`）
    pub fn args(&self) -> Vec<Option<String>> {
        self.captures
            .iter()
            .map(|c| Some(c.value.clone()))
            .chain(std::iter::once(self.query.clone()))
            .collect()
    }

    /// 按名称取捕获值
    pub fn named(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// 位于 `index` 的选项参数；模式未提供时由查询串顶替
    pub fn trailing_options(&self, index: usize) -> Option<&str> {
        self.arg(index).or(self.query.as_deref())
    }
}

// ============================================================================
// 路由缓存
// ============================================================================

/// 路由缓存统计信息
#[derive(Debug, Clone, Serialize)]
pub struct RouteCacheStats {
    /// 缓存命中次数
    pub hits: u64,
    /// 缓存未命中次数
    pub misses: u64,
    /// 当前缓存条目数
    pub size: usize,
    /// 缓存容量
    pub capacity: usize,
}

/// 解析结果缓存（片段 -> 匹配结果）
pub struct RouteCache {
    cache: LruCache<String, RouteMatch>,
    hits: u64,
    misses: u64,
}

impl RouteCache {
    /// 创建缓存，容量为 0 时返回 None
    pub fn new(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|cap| Self {
            cache: LruCache::new(cap),
            hits: 0,
            misses: 0,
        })
    }

    fn get(&mut self, fragment: &str) -> Option<RouteMatch> {
        match self.cache.get(fragment) {
            Some(found) => {
                self.hits += 1;
                Some(found.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn put(&mut self, fragment: &str, found: RouteMatch) {
        self.cache.put(fragment.to_string(), found);
    }

    fn clear(&mut self) {
        self.cache.clear();
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> RouteCacheStats {
        RouteCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }
}

// ============================================================================
// 路由表
// ============================================================================

/// 路由表
///
/// 路由表只应在两次派发之间修改；派发进行中的并发修改由调用方负责避免。
pub struct RouteTable {
    /// 已按检查顺序排列的路由
    routes: Vec<CompiledRoute>,
    next_seq: u64,
    cache: Option<RouteCache>,
}

impl RouteTable {
    /// 创建空路由表
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// 创建指定缓存容量的空路由表（0 表示禁用缓存）
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            routes: Vec::new(),
            next_seq: 0,
            cache: RouteCache::new(capacity),
        }
    }

    /// 创建已安装内置路由的路由表
    pub fn with_builtin_routes(capacity: usize) -> Result<Self> {
        let mut table = Self::with_cache_capacity(capacity);
        // 倒序注册：同 order 时后注册先检查，保持列表中的优先级
        for (pattern, resolution, order) in BUILTIN_ROUTES.iter().rev() {
            table.register(pattern, resolution, *order, Map::new())?;
        }
        Ok(table)
    }

    /// 注册或覆盖路由
    ///
    /// 模式已存在时更新解析器、顺序与参数，但保留首次注册序号。
    pub fn register(
        &mut self,
        pattern: &str,
        resolution: &str,
        order: i32,
        params: Map<String, Value>,
    ) -> Result<()> {
        if let Some(existing) = self.routes.iter_mut().find(|r| r.entry.pattern == pattern) {
            existing.entry.resolution = resolution.to_string();
            existing.entry.order = order;
            existing.entry.params = params;
            debug!(pattern, resolution, order, "覆盖已存在的路由");
        } else {
            let compiled = RoutePattern::parse(pattern)?;
            let seq = self.next_seq;
            self.next_seq += 1;
            self.routes.push(CompiledRoute {
                entry: RouteEntry {
                    pattern: pattern.to_string(),
                    resolution: resolution.to_string(),
                    order,
                    params,
                    seq,
                },
                pattern: compiled,
            });
            info!(pattern, resolution, order, "注册路由");
        }

        self.sort();
        self.clear_cache();
        Ok(())
    }

    /// 移除路由，返回是否存在
    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.routes.len();
        self.routes.retain(|r| r.entry.pattern != pattern);
        let removed = self.routes.len() != before;
        if removed {
            info!(pattern, "移除路由");
            self.clear_cache();
        }
        removed
    }

    fn sort(&mut self) {
        self.routes.sort_by(|a, b| {
            a.entry
                .order
                .cmp(&b.entry.order)
                .then(b.entry.seq.cmp(&a.entry.seq))
        });
    }

    /// 解析片段，返回第一个命中的路由
    pub fn resolve(&mut self, fragment: &str) -> Option<RouteMatch> {
        if let Some(found) = self.cache.as_mut().and_then(|c| c.get(fragment)) {
            return Some(found);
        }

        let found = self.routes.iter().find_map(|route| {
            route.pattern.captures(fragment).map(|m| RouteMatch {
                pattern: route.entry.pattern.clone(),
                resolution: route.entry.resolution.clone(),
                order: route.entry.order,
                captures: m.captures,
                query: m.query,
                params: route.entry.params.clone(),
            })
        })?;

        if let Some(cache) = self.cache.as_mut() {
            cache.put(fragment, found.clone());
        }
        Some(found)
    }

    /// 按检查顺序列出路由条目
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().map(|r| &r.entry)
    }

    /// 按模式查找路由条目
    pub fn get(&self, pattern: &str) -> Option<&RouteEntry> {
        self.entries().find(|e| e.pattern == pattern)
    }

    /// 路由数量
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 获取缓存统计信息（禁用缓存时为 None）
    pub fn cache_stats(&self) -> Option<RouteCacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }

    /// 清空解析缓存
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
