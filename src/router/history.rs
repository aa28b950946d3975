//! 导航历史
//!
//! 与平台历史相互独立的只增栈。"后退"本身也以一次正向压栈记录，
//! 栈长度对每次导航单调递增。

use tracing::debug;

/// 规范化片段：去掉一个前导 `#` 或 `/`，以及尾部空白
///
/// ```
/// use chips_router::router::history::normalize_fragment;
///
/// assert_eq!(normalize_fragment("#Account/view/1"), "Account/view/1");
/// assert_eq!(normalize_fragment("/Account "), "Account");
/// ```
pub fn normalize_fragment(raw: &str) -> &str {
    let trimmed = raw
        .strip_prefix('#')
        .or_else(|| raw.strip_prefix('/'))
        .unwrap_or(raw);
    trimmed.trim_end()
}

/// 导航历史栈
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<String>,
}

impl NavigationHistory {
    /// 创建空历史
    pub fn new() -> Self {
        Self::default()
    }

    /// 压入一个片段
    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        debug!(fragment = %fragment, history_len = self.entries.len() + 1, "历史压栈");
        self.entries.push(fragment);
    }

    /// 后退目标：倒数第二项，只有一项时取第一项，空栈返回 `None`
    pub fn back_target(&self) -> Option<&str> {
        let index = self.entries.len().saturating_sub(2);
        self.entries.get(index).map(String::as_str)
    }

    /// 最近压入的片段
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// 栈长度
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全部历史项，按压栈顺序
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_has_no_back_target() {
        let history = NavigationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.back_target(), None);
    }

    #[test]
    fn test_single_entry_backs_to_itself() {
        let mut history = NavigationHistory::new();
        history.push("a");
        assert_eq!(history.back_target(), Some("a"));
    }

    #[test]
    fn test_back_target_is_second_to_last() {
        let mut history = NavigationHistory::new();
        history.push("a");
        history.push("b");
        assert_eq!(history.back_target(), Some("a"));

        // 后退也是一次压栈
        history.push("a");
        assert_eq!(history.len(), 3);
        assert_eq!(history.back_target(), Some("b"));
        assert_eq!(history.last(), Some("a"));
    }

    #[test]
    fn test_normalize_fragment() {
        assert_eq!(normalize_fragment("#a/b"), "a/b");
        assert_eq!(normalize_fragment("/a/b"), "a/b");
        assert_eq!(normalize_fragment("a/b\n"), "a/b");
        assert_eq!(normalize_fragment("##a"), "#a");
        assert_eq!(normalize_fragment(""), "");
    }
}
