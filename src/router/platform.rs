//! 宿主平台抽象
//!
//! 路由器不直接接触浏览器：改写地址栏的 [`Navigator`] 与展示确认对话框的
//! [`ConfirmDialog`] 由宿主注入。此外提供空实现与记录型实现，供命令行和测试使用。

use std::sync::{Arc, Mutex, PoisonError};

use super::gate::ConfirmPrompt;

/// 导航选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// 是否触发路由
    pub trigger: bool,
    /// 是否替换当前历史项
    pub replace: bool,
}

impl NavigateOptions {
    /// 触发路由的导航
    pub fn trigger() -> Self {
        Self {
            trigger: true,
            replace: false,
        }
    }

    /// 只改写地址、不触发路由的导航
    pub fn silent() -> Self {
        Self {
            trigger: false,
            replace: false,
        }
    }

    /// 设置替换当前历史项
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self::silent()
    }
}

/// 地址改写接口
pub trait Navigator: Send {
    /// 把地址改为 `fragment`
    fn navigate(&mut self, fragment: &str, options: NavigateOptions);
}

/// 确认对话框接口
///
/// 实现只负责展示；用户的选择通过 `Router::confirm_pending` / `Router::cancel_pending` 回传。
pub trait ConfirmDialog: Send {
    /// 展示确认对话框
    fn show(&mut self, prompt: &ConfirmPrompt);
}

/// 不做任何事的导航器
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn navigate(&mut self, _fragment: &str, _options: NavigateOptions) {}
}

/// 不做任何事的确认对话框
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConfirmDialog;

impl ConfirmDialog for NullConfirmDialog {
    fn show(&mut self, _prompt: &ConfirmPrompt) {}
}

/// 一次导航调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCall {
    /// 目标片段
    pub fragment: String,
    /// 导航选项
    pub options: NavigateOptions,
}

/// 记录所有导航调用的导航器
///
/// 克隆体共享同一份记录，可以在交给路由器之后继续检查。
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    calls: Arc<Mutex<Vec<NavigationCall>>>,
}

impl RecordingNavigator {
    /// 创建记录型导航器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的调用
    pub fn calls(&self) -> Vec<NavigationCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 最近一次调用
    pub fn last(&self) -> Option<NavigationCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// 清空记录
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, fragment: &str, options: NavigateOptions) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NavigationCall {
                fragment: fragment.to_string(),
                options,
            });
    }
}

/// 记录展示过的提示的确认对话框
#[derive(Debug, Default, Clone)]
pub struct RecordingConfirmDialog {
    shown: Arc<Mutex<Vec<ConfirmPrompt>>>,
}

impl RecordingConfirmDialog {
    /// 创建记录型确认对话框
    pub fn new() -> Self {
        Self::default()
    }

    /// 对话框展示次数
    pub fn shown_count(&self) -> usize {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 最近一次展示的提示
    pub fn last(&self) -> Option<ConfirmPrompt> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl ConfirmDialog for RecordingConfirmDialog {
    fn show(&mut self, prompt: &ConfirmPrompt) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_options() {
        assert!(NavigateOptions::trigger().trigger);
        assert!(!NavigateOptions::silent().trigger);
        assert!(NavigateOptions::silent().with_replace(true).replace);
        assert_eq!(NavigateOptions::default(), NavigateOptions::silent());
    }

    #[test]
    fn test_recording_navigator_shares_calls() {
        let navigator = RecordingNavigator::new();
        let mut handle = navigator.clone();
        handle.navigate("Account", NavigateOptions::trigger());
        handle.navigate("", NavigateOptions::silent());

        assert_eq!(navigator.calls().len(), 2);
        assert_eq!(navigator.last().unwrap().fragment, "");

        navigator.clear();
        assert!(navigator.calls().is_empty());
    }

    #[test]
    fn test_recording_confirm_dialog() {
        let dialog = RecordingConfirmDialog::new();
        let mut handle = dialog.clone();
        handle.show(&ConfirmPrompt::default());

        assert_eq!(dialog.shown_count(), 1);
        assert_eq!(dialog.last().unwrap().message, "Are you sure?");
    }
}
