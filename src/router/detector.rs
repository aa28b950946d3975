//! 前进/后退识别
//!
//! 平台的 hash 变化事件不区分"用户点了后退"、"用户点了前进"和"程序导航"。
//! [`NavigationDetector`] 把这一判断隔离成可替换的策略：
//!
//! - [`HistoryLengthDetector`]：维护观察到的片段影子列表与平台历史长度，
//!   长度不变且当前片段等于影子列表倒数第二项时判为后退。
//!   这是尽力而为的启发式：平台合并多次历史长度变化时可能误判。
//! - [`StateTokenDetector`]：平台为每个历史项提供单调递增的状态令牌时，
//!   直接比较令牌大小，不依赖历史长度。

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use crate::core::config::DetectorKind;

/// 识别出的导航方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// 后退
    Back,
    /// 前进
    Forward,
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationDirection::Back => write!(f, "back"),
            NavigationDirection::Forward => write!(f, "forward"),
        }
    }
}

/// 一次 hash 变化观察
#[derive(Debug, Clone, Copy)]
pub struct HashObservation<'a> {
    /// 规范化后的片段
    pub hash: &'a str,
    /// 平台报告的历史长度
    pub history_length: usize,
    /// 平台提供的历史项状态令牌
    pub state_token: Option<u64>,
}

impl<'a> HashObservation<'a> {
    /// 创建观察
    pub fn new(hash: &'a str, history_length: usize) -> Self {
        Self {
            hash,
            history_length,
            state_token: None,
        }
    }

    /// 附带状态令牌
    pub fn with_state_token(mut self, token: Option<u64>) -> Self {
        self.state_token = token;
        self
    }
}

/// 导航方向识别策略
pub trait NavigationDetector: Send {
    /// 记录初始位置，不做判断
    fn seed(&mut self, observation: &HashObservation<'_>);

    /// 观察一次 hash 变化并给出方向；无法判断时返回 `None`
    fn observe(&mut self, observation: &HashObservation<'_>) -> Option<NavigationDirection>;
}

/// 按配置创建识别策略
pub fn detector_for(kind: DetectorKind) -> Box<dyn NavigationDetector> {
    match kind {
        DetectorKind::HistoryLength => Box::new(HistoryLengthDetector::new()),
        DetectorKind::StateToken => Box::new(StateTokenDetector::new()),
    }
}

// ============================================================================
// 历史长度启发式
// ============================================================================

/// 基于历史长度的启发式识别
#[derive(Debug, Clone, Default)]
pub struct HistoryLengthDetector {
    shadow: Vec<String>,
    history_length: Option<usize>,
}

impl HistoryLengthDetector {
    /// 创建识别器
    pub fn new() -> Self {
        Self::default()
    }

    /// 影子列表
    pub fn shadow(&self) -> &[String] {
        &self.shadow
    }
}

impl NavigationDetector for HistoryLengthDetector {
    fn seed(&mut self, observation: &HashObservation<'_>) {
        self.shadow.clear();
        self.shadow.push(observation.hash.to_string());
        self.history_length = Some(observation.history_length);
    }

    fn observe(&mut self, observation: &HashObservation<'_>) -> Option<NavigationDirection> {
        let unchanged = self.history_length == Some(observation.history_length);
        self.history_length = Some(observation.history_length);

        if !self.shadow.is_empty() && unchanged {
            let previous = self
                .shadow
                .len()
                .checked_sub(2)
                .and_then(|i| self.shadow.get(i));
            if previous.map(String::as_str) == Some(observation.hash) {
                self.shadow.pop();
                return Some(NavigationDirection::Back);
            }

            self.shadow.push(observation.hash.to_string());
            return Some(NavigationDirection::Forward);
        }

        self.shadow.push(observation.hash.to_string());
        None
    }
}

// ============================================================================
// 状态令牌
// ============================================================================

/// 基于历史项状态令牌的识别
#[derive(Debug, Clone, Default)]
pub struct StateTokenDetector {
    current: Option<u64>,
    highest: Option<u64>,
}

impl StateTokenDetector {
    /// 创建识别器
    pub fn new() -> Self {
        Self::default()
    }
}

impl NavigationDetector for StateTokenDetector {
    fn seed(&mut self, observation: &HashObservation<'_>) {
        self.current = observation.state_token;
        self.highest = observation.state_token;
    }

    fn observe(&mut self, observation: &HashObservation<'_>) -> Option<NavigationDirection> {
        let token = observation.state_token?;
        let direction = match (self.current, self.highest) {
            (Some(current), _) if token < current => Some(NavigationDirection::Back),
            (Some(current), Some(highest)) if token > current && token <= highest => {
                Some(NavigationDirection::Forward)
            }
            _ => None,
        };

        self.current = Some(token);
        self.highest = Some(self.highest.map_or(token, |h| h.max(token)));
        direction
    }
}

// ============================================================================
// backProcessed 窗口
// ============================================================================

/// 后退识别后的短暂标记
///
/// 重新识别到后退会重新计时，无需取消旧计时。
#[derive(Debug, Clone)]
pub struct BackProcessedFlag {
    window: Duration,
    deadline: Option<Instant>,
}

impl BackProcessedFlag {
    /// 创建标记，`window` 为有效时长
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// 置位并开始计时
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// 是否仍在窗口内
    pub fn is_set(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() < d)
    }

    /// 有效时长
    pub fn window(&self) -> Duration {
        self.window
    }
}
