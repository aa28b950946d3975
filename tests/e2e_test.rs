//! 端到端测试
//!
//! 模拟宿主平台：地址栏 hash 变化、平台历史长度与状态令牌，
//! 验证路由器在完整导航流程中的行为。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chips_router::router::{
    Event, GateOutcome, NavigateOptions, RecordingConfirmDialog, RecordingNavigator,
};
use chips_router::{DetectorKind, Router, RouterConfig};

/// 模拟浏览器：维护平台历史栈，并把路由器的导航调用落到栈上
struct FakeBrowser {
    entries: Vec<String>,
    index: usize,
}

impl FakeBrowser {
    fn new(initial: &str) -> Self {
        Self {
            entries: vec![initial.to_string()],
            index: 0,
        }
    }

    fn push(&mut self, hash: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(hash.to_string());
        self.index += 1;
    }

    fn back(&mut self) -> &str {
        self.index -= 1;
        &self.entries[self.index]
    }

    fn forward(&mut self) -> &str {
        self.index += 1;
        &self.entries[self.index]
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn token(&self) -> Option<u64> {
        Some(self.index as u64)
    }
}

fn event_log(router: &mut Router) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    router.subscribe(
        "history.*",
        Arc::new(move |event: &Event| sink.lock().unwrap().push(event.event_type.clone())),
    );
    seen
}

/// 用户点击链接、再按后退、再按前进
#[tokio::test(start_paused = true)]
async fn test_history_length_detection_flow() {
    let mut router = Router::with_defaults().unwrap();
    let history_events = event_log(&mut router);
    let mut browser = FakeBrowser::new("#");

    router.start("#", browser.len(), None).unwrap();
    assert_eq!(router.get_last().unwrap().controller.as_deref(), Some("Home"));

    // 点击链接：平台历史增长，不做判断
    browser.push("#Account");
    router.handle_hash_change("#Account", browser.len(), None).unwrap();
    browser.push("#Account/view/1");
    router
        .handle_hash_change("#Account/view/1", browser.len(), None)
        .unwrap();
    assert!(history_events.lock().unwrap().is_empty());

    // 后退：历史长度不变，片段等于影子列表倒数第二项
    let hash = browser.back().to_string();
    let outcome = router.handle_hash_change(&hash, browser.len(), None).unwrap();
    assert!(outcome.unwrap().is_completed());
    assert_eq!(*history_events.lock().unwrap(), vec!["history.back"]);
    assert!(router.is_back_processed());
    assert_eq!(router.get_last().unwrap().controller.as_deref(), Some("Account"));

    // 窗口过后标记自动清除
    tokio::time::advance(Duration::from_millis(60)).await;
    assert!(!router.is_back_processed());

    // 前进
    let hash = browser.forward().to_string();
    router.handle_hash_change(&hash, browser.len(), None).unwrap();
    assert_eq!(
        *history_events.lock().unwrap(),
        vec!["history.back", "history.forward"]
    );
    assert!(!router.is_back_processed());

    let stats = router.stats();
    assert_eq!(stats.back_detected, 1);
    assert_eq!(stats.forward_detected, 1);
}

/// 可配置的后退窗口
#[tokio::test(start_paused = true)]
async fn test_custom_back_window() {
    let config = RouterConfig::builder().back_window_ms(200).build();
    let mut router = Router::builder().config(config).build().unwrap();

    router.start("#", 1, None).unwrap();
    router.handle_hash_change("#Lead", 2, None).unwrap();
    router.handle_hash_change("#", 2, None).unwrap();
    assert!(router.is_back_processed());

    tokio::time::advance(Duration::from_millis(150)).await;
    assert!(router.is_back_processed());

    tokio::time::advance(Duration::from_millis(60)).await;
    assert!(!router.is_back_processed());
}

/// 状态令牌识别不受历史长度影响
#[tokio::test(start_paused = true)]
async fn test_state_token_detection_flow() {
    let config = RouterConfig::builder()
        .detector(DetectorKind::StateToken)
        .build();
    let mut router = Router::builder().config(config).build().unwrap();
    let history_events = event_log(&mut router);
    let mut browser = FakeBrowser::new("#");

    router.start("#", browser.len(), browser.token()).unwrap();

    browser.push("#Account");
    router
        .handle_hash_change("#Account", browser.len(), browser.token())
        .unwrap();
    browser.push("#Lead");
    router
        .handle_hash_change("#Lead", browser.len(), browser.token())
        .unwrap();

    let hash = browser.back().to_string();
    router
        .handle_hash_change(&hash, browser.len(), browser.token())
        .unwrap();
    let hash = browser.back().to_string();
    router
        .handle_hash_change(&hash, browser.len(), browser.token())
        .unwrap();
    let hash = browser.forward().to_string();
    router
        .handle_hash_change(&hash, browser.len(), browser.token())
        .unwrap();

    assert_eq!(
        *history_events.lock().unwrap(),
        vec!["history.back", "history.back", "history.forward"]
    );
    assert_eq!(router.get_current_url(), "#Account");
}

/// 编辑表单时离开：提示、取消、恢复地址，确认后再离开
#[tokio::test]
async fn test_unsaved_form_flow() {
    let navigator = RecordingNavigator::new();
    let dialog = RecordingConfirmDialog::new();
    let mut router = Router::builder()
        .navigator(navigator.clone())
        .confirm_dialog(dialog.clone())
        .build()
        .unwrap();

    router.start("#Account/edit/5", 1, None).unwrap();
    router.set_confirm_required(true);

    // 用户点击链接
    let outcome = router.handle_hash_change("#Lead", 2, None).unwrap();
    assert_eq!(outcome, Some(GateOutcome::AwaitingConfirm));
    assert_eq!(dialog.shown_count(), 1);

    // 取消：地址静默回到编辑页
    router.cancel_pending().unwrap();
    let revert = navigator.last().unwrap();
    assert_eq!(revert.fragment, "Account/edit/5");
    assert!(!revert.options.trigger);

    // 宿主随后报告地址变化，片段与当前一致，不会再次路由
    assert_eq!(
        router.handle_hash_change("#Account/edit/5", 3, None).unwrap(),
        None
    );

    // 再次尝试离开并确认
    router.handle_hash_change("#Lead", 4, None).unwrap();
    let record = router.confirm_pending().unwrap().unwrap();
    assert_eq!(record.controller.as_deref(), Some("Lead"));
    assert!(!router.confirm_required());
    assert_eq!(dialog.shown_count(), 2);
}

/// 快速连续导航不会叠加提示
#[tokio::test]
async fn test_rapid_navigation_does_not_stack_prompts() {
    let navigator = RecordingNavigator::new();
    let dialog = RecordingConfirmDialog::new();
    let mut router = Router::builder()
        .navigator(navigator.clone())
        .confirm_dialog(dialog.clone())
        .build()
        .unwrap();

    router.start("#Account/edit/5", 1, None).unwrap();
    router.set_confirm_required(true);

    router.handle_hash_change("#Lead", 2, None).unwrap();
    let outcome = router.handle_hash_change("#Contact", 3, None).unwrap();
    assert_eq!(outcome, Some(GateOutcome::Blocked));
    assert_eq!(dialog.shown_count(), 1);
    assert_eq!(navigator.last().unwrap().fragment, "Account/edit/5");

    router.cancel_pending().unwrap();
    assert_eq!(router.stats().reentrant_blocks, 1);
    assert_eq!(router.get_last().unwrap().controller.as_deref(), Some("Account"));
}

/// 注销：派发后静默回到空片段
#[tokio::test]
async fn test_logout_flow() {
    let navigator = RecordingNavigator::new();
    let mut router = Router::builder()
        .navigator(navigator.clone())
        .build()
        .unwrap();
    router.register_route("logout", "logout", None).unwrap();

    router.start("#Account", 1, None).unwrap();
    router
        .navigate("logout", NavigateOptions::trigger())
        .unwrap();

    assert_eq!(router.get_last().unwrap().action.as_deref(), Some("logout"));
    let calls = navigator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].fragment, "");
    assert!(!calls[1].options.trigger);
    assert_eq!(router.get_current_url(), "#");
}
