//! 导航统计
//!
//! 记录路由触发、派发、确认拦截与前进/后退识别的计数。

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// 导航统计计数器
#[derive(Debug, Default)]
pub struct NavigationStats {
    /// 路由触发次数（含被拦截的）
    routes_triggered: AtomicU64,
    /// 成功派发次数
    dispatched: AtomicU64,
    /// 等待确认次数
    confirm_prompts: AtomicU64,
    /// 重入拦截次数
    reentrant_blocks: AtomicU64,
    /// 用户取消次数
    canceled: AtomicU64,
    /// 导航调用次数
    navigations: AtomicU64,
    /// 识别为后退的次数
    back_detected: AtomicU64,
    /// 识别为前进的次数
    forward_detected: AtomicU64,
}

/// 统计事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// 路由触发
    RouteTriggered,
    /// 成功派发
    Dispatched,
    /// 展示确认提示
    ConfirmPrompt,
    /// 重入拦截
    ReentrantBlock,
    /// 用户取消
    Canceled,
    /// 导航调用
    Navigation,
    /// 识别为后退
    BackDetected,
    /// 识别为前进
    ForwardDetected,
}

impl NavigationStats {
    /// 创建新的统计实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次统计事件
    pub fn record(&self, kind: StatKind) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
    }

    fn counter(&self, kind: StatKind) -> &AtomicU64 {
        match kind {
            StatKind::RouteTriggered => &self.routes_triggered,
            StatKind::Dispatched => &self.dispatched,
            StatKind::ConfirmPrompt => &self.confirm_prompts,
            StatKind::ReentrantBlock => &self.reentrant_blocks,
            StatKind::Canceled => &self.canceled,
            StatKind::Navigation => &self.navigations,
            StatKind::BackDetected => &self.back_detected,
            StatKind::ForwardDetected => &self.forward_detected,
        }
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> NavigationStatsSnapshot {
        let load = |kind| self.counter(kind).load(Ordering::Relaxed);
        NavigationStatsSnapshot {
            routes_triggered: load(StatKind::RouteTriggered),
            dispatched: load(StatKind::Dispatched),
            confirm_prompts: load(StatKind::ConfirmPrompt),
            reentrant_blocks: load(StatKind::ReentrantBlock),
            canceled: load(StatKind::Canceled),
            navigations: load(StatKind::Navigation),
            back_detected: load(StatKind::BackDetected),
            forward_detected: load(StatKind::ForwardDetected),
        }
    }

    /// 重置统计
    pub fn reset(&self) {
        for counter in [
            &self.routes_triggered,
            &self.dispatched,
            &self.confirm_prompts,
            &self.reentrant_blocks,
            &self.canceled,
            &self.navigations,
            &self.back_detected,
            &self.forward_detected,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// 导航统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationStatsSnapshot {
    /// 路由触发次数
    pub routes_triggered: u64,
    /// 成功派发次数
    pub dispatched: u64,
    /// 等待确认次数
    pub confirm_prompts: u64,
    /// 重入拦截次数
    pub reentrant_blocks: u64,
    /// 用户取消次数
    pub canceled: u64,
    /// 导航调用次数
    pub navigations: u64,
    /// 后退识别次数
    pub back_detected: u64,
    /// 前进识别次数
    pub forward_detected: u64,
}
