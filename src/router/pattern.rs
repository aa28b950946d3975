//! 路由模式匹配器
//!
//! 将路由字符串编译为正则表达式，用于测试 URL 片段并提取位置参数。
//!
//! 模式语法（按 `/` 分段，区分大小写）：
//!
//! - 字面段：`view`、`clearCache`
//! - `:name`：捕获单个段（不含 `/` 与 `?`）
//! - `*name`：捕获剩余全部内容（含 `/`），只能出现在最后一段
//!
//! 片段末尾的 `?query` 不参与捕获，单独返回。

use regex::Regex;
use std::collections::HashSet;

use crate::utils::{Result, RouterError};

/// 单个捕获值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// 捕获名（不含 `:` / `*` 前缀）
    pub name: String,
    /// 捕获到的值
    pub value: String,
    /// 是否为 `*name` 形式
    pub splat: bool,
}

/// 一次成功匹配的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// 按出现顺序排列的捕获
    pub captures: Vec<Capture>,
    /// `?` 之后的查询串
    pub query: Option<String>,
}

#[derive(Debug, Clone)]
struct CaptureSlot {
    name: String,
    splat: bool,
}

/// 编译后的路由模式
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    slots: Vec<CaptureSlot>,
}

impl RoutePattern {
    /// 编译路由模式
    ///
    /// # Errors
    ///
    /// 模式为空、捕获名为空、捕获名重复或 `*name` 不在最后一段时返回 `RouterError::InvalidPattern`
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(RouterError::invalid_pattern(pattern, "模式不能为空"));
        }

        let segments: Vec<&str> = pattern.split('/').collect();
        let mut slots = Vec::new();
        let mut seen = HashSet::new();
        let mut parts = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            let (splat, name) = if let Some(name) = segment.strip_prefix(':') {
                (false, name)
            } else if let Some(name) = segment.strip_prefix('*') {
                if i + 1 != segments.len() {
                    return Err(RouterError::invalid_pattern(pattern, "*name 只能位于最后一段"));
                }
                (true, name)
            } else {
                parts.push(regex::escape(segment));
                continue;
            };

            if name.is_empty() {
                return Err(RouterError::invalid_pattern(pattern, "捕获名不能为空"));
            }
            if !seen.insert(name) {
                return Err(RouterError::invalid_pattern(
                    pattern,
                    format!("捕获名 '{}' 重复", name),
                ));
            }

            parts.push(if splat { "([^?]*?)" } else { "([^/?]+)" }.to_string());
            slots.push(CaptureSlot {
                name: name.to_string(),
                splat,
            });
        }

        let source = format!(r"^{}(?:\?([\s\S]*))?$", parts.join("/"));
        let regex = Regex::new(&source)
            .map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            slots,
        })
    }

    /// 原始模式字符串
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 捕获名列表（按出现顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// 是否包含 `*name` 捕获
    pub fn has_splat(&self) -> bool {
        self.slots.iter().any(|s| s.splat)
    }

    /// 测试片段是否匹配
    pub fn is_match(&self, fragment: &str) -> bool {
        self.regex.is_match(fragment)
    }

    /// 匹配片段并提取捕获
    pub fn captures(&self, fragment: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(fragment)?;

        let captures = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| Capture {
                name: slot.name.clone(),
                value: caps
                    .get(i + 1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                splat: slot.splat,
            })
            .collect();

        let query = caps
            .get(self.slots.len() + 1)
            .map(|m| m.as_str().to_string());

        Some(PatternMatch { captures, query })
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}
