//! 离开确认闸门
//!
//! 每次路由执行前检查是否允许离开当前页面。状态机：
//!
//! ```text
//!            confirm_required            用户确认
//!   Idle ───────────────────▶ AwaitingConfirm ─────────▶ Idle（执行挂起动作）
//!     ▲                          │        │
//!     │          用户取消         │        │ 提示期间再次执行（重入）
//!     └──────────────────────────┘        ▼
//!     ▲                                Canceled
//!     └──────── 用户确认或取消 ──────────────┘（挂起动作不再执行）
//! ```
//!
//! 重入规则：提示仍在展示时再次执行路由，不叠加第二个提示，
//! 而是立即静默后退并把挂起的确认标记为已取消。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::ConfirmConfig;

/// 闸门状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// 空闲
    Idle,
    /// 等待用户确认
    AwaitingConfirm,
    /// 等待中的确认已被重入取消
    Canceled,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Idle => write!(f, "idle"),
            GateState::AwaitingConfirm => write!(f, "awaiting_confirm"),
            GateState::Canceled => write!(f, "canceled"),
        }
    }
}

/// 确认对话框的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    /// 提示消息
    pub message: String,
    /// 确认按钮文字
    pub confirm_text: String,
    /// 取消按钮文字
    pub cancel_text: String,
    /// 是否显示遮罩
    pub backdrop: bool,
}

impl From<&ConfirmConfig> for ConfirmPrompt {
    fn from(config: &ConfirmConfig) -> Self {
        Self {
            message: config.message.clone(),
            confirm_text: config.confirm_text.clone(),
            cancel_text: config.cancel_text.clone(),
            backdrop: config.backdrop,
        }
    }
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self::from(&ConfirmConfig::default())
    }
}

/// 闸门检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCheck {
    /// 直接放行
    Proceed,
    /// 需要展示确认提示
    AskConfirm(ConfirmPrompt),
    /// 提示展示期间重入
    Reentered,
}

/// 离开确认闸门
#[derive(Debug, Clone, Default)]
pub struct LeaveConfirmGate {
    required: bool,
    displayed: bool,
    canceled: bool,
    prompt: ConfirmPrompt,
}

impl LeaveConfirmGate {
    /// 使用给定提示内容创建闸门
    pub fn new(prompt: ConfirmPrompt) -> Self {
        Self {
            prompt,
            ..Self::default()
        }
    }

    /// 执行前检查
    pub fn check(&mut self) -> GateCheck {
        if self.displayed {
            self.canceled = true;
            return GateCheck::Reentered;
        }

        if self.required {
            self.displayed = true;
            self.canceled = false;
            return GateCheck::AskConfirm(self.prompt.clone());
        }

        GateCheck::Proceed
    }

    /// 用户确认；返回挂起的动作是否仍应执行
    ///
    /// 没有展示中的提示时不做任何事并返回 `false`。
    pub fn confirm(&mut self) -> bool {
        if !self.displayed {
            return false;
        }
        self.displayed = false;
        self.required = false;
        !self.canceled
    }

    /// 用户取消；没有展示中的提示时返回 `false`
    pub fn cancel(&mut self) -> bool {
        if !self.displayed {
            return false;
        }
        self.displayed = false;
        self.canceled = true;
        true
    }

    /// 最近一次提示是否以取消告终（用户取消或重入）
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// 当前状态
    pub fn state(&self) -> GateState {
        match (self.displayed, self.canceled) {
            (false, _) => GateState::Idle,
            (true, false) => GateState::AwaitingConfirm,
            (true, true) => GateState::Canceled,
        }
    }

    /// 设置是否需要离开确认
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// 是否需要离开确认
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// 提示是否正在展示
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// 替换提示内容
    pub fn set_prompt(&mut self, prompt: ConfirmPrompt) {
        self.prompt = prompt;
    }

    /// 提示内容
    pub fn prompt(&self) -> &ConfirmPrompt {
        &self.prompt
    }

    /// 页面卸载时的提示语；不需要确认时为 `None`
    pub fn leave_warning(&self) -> Option<&str> {
        self.required.then_some(self.prompt.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proceed_when_not_required() {
        let mut gate = LeaveConfirmGate::default();
        assert_eq!(gate.check(), GateCheck::Proceed);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.leave_warning(), None);
    }

    #[test]
    fn test_confirm_clears_required() {
        let mut gate = LeaveConfirmGate::default();
        gate.set_required(true);
        assert_eq!(gate.leave_warning(), Some("Are you sure?"));

        assert!(matches!(gate.check(), GateCheck::AskConfirm(p) if p.confirm_text == "Yes"));
        assert_eq!(gate.state(), GateState::AwaitingConfirm);

        assert!(gate.confirm());
        assert!(!gate.is_required());
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.check(), GateCheck::Proceed);
    }

    #[test]
    fn test_cancel_keeps_required() {
        let mut gate = LeaveConfirmGate::default();
        gate.set_required(true);
        gate.check();

        assert!(gate.cancel());
        assert!(gate.is_required());
        assert!(gate.is_canceled());
        assert_eq!(gate.state(), GateState::Idle);
        assert!(!gate.cancel());
    }

    #[test]
    fn test_decline_marks_canceled_until_next_prompt() {
        let mut gate = LeaveConfirmGate::default();
        gate.set_required(true);
        assert!(!gate.is_canceled());

        gate.check();
        gate.cancel();
        assert!(gate.is_canceled());
        // 取消后提示已关闭，确认无效
        assert!(!gate.confirm());

        assert!(matches!(gate.check(), GateCheck::AskConfirm(_)));
        assert!(!gate.is_canceled());
        assert_eq!(gate.state(), GateState::AwaitingConfirm);
    }

    #[test]
    fn test_reentry_cancels_pending() {
        let mut gate = LeaveConfirmGate::default();
        gate.set_required(true);
        gate.check();

        assert_eq!(gate.check(), GateCheck::Reentered);
        assert_eq!(gate.state(), GateState::Canceled);

        // 确认后挂起动作不再执行，但离开确认已解除
        assert!(!gate.confirm());
        assert!(!gate.is_required());
    }

    #[test]
    fn test_new_prompt_resets_canceled() {
        let mut gate = LeaveConfirmGate::default();
        gate.set_required(true);
        gate.check();
        gate.check();
        gate.cancel();

        assert!(matches!(gate.check(), GateCheck::AskConfirm(_)));
        assert_eq!(gate.state(), GateState::AwaitingConfirm);
        assert!(gate.confirm());
    }

    #[test]
    fn test_confirm_without_prompt() {
        let mut gate = LeaveConfirmGate::default();
        assert!(!gate.confirm());
    }

    #[test]
    fn test_custom_prompt() {
        let config = ConfirmConfig {
            message: "Discard changes?".to_string(),
            ..ConfirmConfig::default()
        };
        let mut gate = LeaveConfirmGate::new(ConfirmPrompt::from(&config));
        gate.set_required(true);
        assert_eq!(gate.leave_warning(), Some("Discard changes?"));
    }
}
