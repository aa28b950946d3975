//! 事件总线
//!
//! 同步、按订阅顺序分发的事件总线。路由运行在单线程事件循环上，
//! 事件必须严格按解析顺序送达，因此这里不做并发分发，也不隔离回调中的 panic。
//!
//! # 使用示例
//!
//! ```
//! use chips_router::router::{Event, EventBus};
//! use std::sync::Arc;
//!
//! let mut bus = EventBus::new();
//! let id = bus.subscribe("route.*", Arc::new(|event: &Event| {
//!     println!("路由触发: {}", event.event_type);
//! }));
//! bus.publish(&Event::new("route.view", serde_json::json!({})));
//! bus.unsubscribe(&id).unwrap();
//! ```

use std::sync::Arc;
use tracing::{debug, trace};

use super::event::Event;
use crate::utils::{generate_id, Result, RouterError};

/// 事件回调函数类型
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Clone)]
struct SubscriptionEntry {
    subscription_id: String,
    pattern: String,
    callback: EventCallback,
}

/// 事件总线
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Vec<SubscriptionEntry>,
}

impl EventBus {
    /// 创建新的事件总线
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅事件，返回订阅 ID
    ///
    /// `pattern` 支持 `*`、`prefix.*` 与精确类型。
    pub fn subscribe(&mut self, pattern: impl Into<String>, callback: EventCallback) -> String {
        let entry = SubscriptionEntry {
            subscription_id: generate_id(),
            pattern: pattern.into(),
            callback,
        };
        let id = entry.subscription_id.clone();
        debug!(subscription_id = %id, pattern = %entry.pattern, "事件订阅成功");
        self.subscriptions.push(entry);
        id
    }

    /// 取消订阅
    ///
    /// # 错误
    ///
    /// 订阅不存在时返回 `RouterError::SubscriptionNotFound`
    pub fn unsubscribe(&mut self, subscription_id: &str) -> Result<()> {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|s| s.subscription_id != subscription_id);
        if self.subscriptions.len() == before {
            return Err(RouterError::SubscriptionNotFound(subscription_id.to_string()));
        }
        debug!(subscription_id, "取消订阅成功");
        Ok(())
    }

    /// 发布事件，按订阅顺序同步调用回调，返回送达的订阅者数量
    pub fn publish(&self, event: &Event) -> usize {
        let mut delivered = 0;
        for sub in &self.subscriptions {
            if Event::matches_pattern(&sub.pattern, &event.event_type) {
                (sub.callback)(event);
                delivered += 1;
            }
        }
        trace!(event_type = %event.event_type, delivered, "事件已发布");
        delivered
    }

    /// 当前订阅数量
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, EventCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: EventCallback = Arc::new(move |event: &Event| {
            sink.lock().unwrap().push(event.event_type.clone());
        });
        (seen, callback)
    }

    #[test]
    fn test_publish_in_order() {
        let mut bus = EventBus::new();
        let (seen, callback) = recorder();
        bus.subscribe("*", callback);

        bus.publish(&Event::new("route", json!({})));
        bus.publish(&Event::new("routed", json!({})));

        assert_eq!(*seen.lock().unwrap(), vec!["route", "routed"]);
    }

    #[test]
    fn test_pattern_filtering() {
        let mut bus = EventBus::new();
        let (seen, callback) = recorder();
        bus.subscribe("route.*", callback);

        assert_eq!(bus.publish(&Event::new("route.view", json!({}))), 1);
        assert_eq!(bus.publish(&Event::new("routed", json!({}))), 0);
        assert_eq!(*seen.lock().unwrap(), vec!["route.view"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (seen, callback) = recorder();
        let id = bus.subscribe("routed", callback);
        bus.unsubscribe(&id).unwrap();

        bus.publish(&Event::new("routed", json!({})));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.subscription_count(), 0);

        let err = bus.unsubscribe(&id).unwrap_err();
        assert!(matches!(err, RouterError::SubscriptionNotFound(_)));
    }
}
