//! 路由器主结构体
//!
//! 整合路由表、派发器、导航历史、前进/后退识别与离开确认闸门，
//! 对外提供完整的片段路由与导航功能。
//!
//! 路由器运行在宿主的单线程事件循环上：所有方法都取 `&mut self`，
//! 两次 `execute` 不会交错。确认对话框的结果通过
//! [`Router::confirm_pending`] / [`Router::cancel_pending`] 异步回传。

use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::detector::{
    detector_for, BackProcessedFlag, HashObservation, NavigationDetector, NavigationDirection,
};
use super::dispatcher::{DispatchRecord, Dispatcher, Resolved};
use super::event::{router_events, Event};
use super::event_bus::{EventBus, EventCallback};
use super::gate::{ConfirmPrompt, GateCheck, GateState, LeaveConfirmGate};
use super::history::{normalize_fragment, NavigationHistory};
use super::platform::{ConfirmDialog, NavigateOptions, Navigator, NullConfirmDialog, NullNavigator};
use super::route_table::{RouteMatch, RouteTable};
use crate::core::config::RouterConfig;
use crate::utils::{NavigationStats, NavigationStatsSnapshot, Result, RouterError, StatKind};

/// 经过离开确认闸门的操作结果
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome<T> {
    /// 已放行并执行
    Completed(T),
    /// 已展示确认提示，等待用户回应
    AwaitingConfirm,
    /// 提示展示期间重入，已强制静默后退，操作未执行
    Blocked,
}

impl<T> GateOutcome<T> {
    /// 是否已执行
    pub fn is_completed(&self) -> bool {
        matches!(self, GateOutcome::Completed(_))
    }

    /// 取出执行结果
    pub fn completed(self) -> Option<T> {
        match self {
            GateOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// 经确认闸门放行后执行的调用方动作
pub type GuardedAction = Box<dyn FnOnce(&mut Router) -> Result<()> + Send>;

enum PendingAction {
    Route(RouteMatch),
    Custom(GuardedAction),
}

struct Pending {
    action: PendingAction,
    navigate_back: bool,
}

enum Admission {
    Proceed(PendingAction),
    AwaitingConfirm,
    Blocked,
}

// ============================================================================
// 构建器
// ============================================================================

/// 路由器构建器
pub struct RouterBuilder {
    config: RouterConfig,
    navigator: Box<dyn Navigator>,
    confirm_dialog: Box<dyn ConfirmDialog>,
    detector: Option<Box<dyn NavigationDetector>>,
}

impl RouterBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            navigator: Box::new(NullNavigator),
            confirm_dialog: Box::new(NullConfirmDialog),
            detector: None,
        }
    }

    /// 设置配置
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置地址改写实现
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    /// 设置确认对话框实现
    pub fn confirm_dialog(mut self, dialog: impl ConfirmDialog + 'static) -> Self {
        self.confirm_dialog = Box::new(dialog);
        self
    }

    /// 替换前进/后退识别策略（默认按配置选择）
    pub fn detector(mut self, detector: impl NavigationDetector + 'static) -> Self {
        self.detector = Some(Box::new(detector));
        self
    }

    /// 构建路由器
    pub fn build(self) -> Result<Router> {
        self.config.validate()?;

        let mut table = RouteTable::with_builtin_routes(self.config.cache_capacity)?;
        for route in &self.config.routes {
            table.register(
                &route.pattern,
                &route.resolution,
                route.order,
                route.params.clone(),
            )?;
        }

        let detector = self
            .detector
            .unwrap_or_else(|| detector_for(self.config.detector));

        info!(
            routes = table.len(),
            detector = ?self.config.detector,
            "路由器已创建"
        );

        Ok(Router {
            table,
            dispatcher: Dispatcher::new(),
            history: NavigationHistory::new(),
            gate: LeaveConfirmGate::new(ConfirmPrompt::from(&self.config.confirm)),
            detector,
            back_processed: BackProcessedFlag::new(Duration::from_millis(
                self.config.back_window_ms,
            )),
            navigator: self.navigator,
            confirm_dialog: self.confirm_dialog,
            events: EventBus::new(),
            stats: NavigationStats::new(),
            fragment: String::new(),
            last: None,
            pending: None,
            config: self.config,
        })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 路由器
// ============================================================================

/// 路由器
pub struct Router {
    config: RouterConfig,
    table: RouteTable,
    dispatcher: Dispatcher,
    history: NavigationHistory,
    gate: LeaveConfirmGate,
    detector: Box<dyn NavigationDetector>,
    back_processed: BackProcessedFlag,
    navigator: Box<dyn Navigator>,
    confirm_dialog: Box<dyn ConfirmDialog>,
    events: EventBus,
    stats: NavigationStats,
    /// 当前片段
    fragment: String,
    /// 最近一次派发
    last: Option<DispatchRecord>,
    pending: Option<Pending>,
}

impl Router {
    /// 创建构建器
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// 使用默认配置与空平台实现创建路由器
    pub fn with_defaults() -> Result<Self> {
        RouterBuilder::new().build()
    }

    // ==================== 路由注册 ====================

    /// 注册或覆盖路由，`order` 缺省为 0
    pub fn register_route(
        &mut self,
        pattern: &str,
        resolution: &str,
        order: Option<i32>,
    ) -> Result<()> {
        self.register_route_with_params(pattern, resolution, order, Map::new())
    }

    /// 注册带参数的路由
    ///
    /// 参数随命中结果交给解析器；`defaultRoute` 用它补充控制器、动作与缺省选项。
    pub fn register_route_with_params(
        &mut self,
        pattern: &str,
        resolution: &str,
        order: Option<i32>,
        params: Map<String, Value>,
    ) -> Result<()> {
        self.table
            .register(pattern, resolution, order.unwrap_or(0), params)
    }

    /// 移除路由
    pub fn remove_route(&mut self, pattern: &str) -> bool {
        self.table.remove(pattern)
    }

    /// 注册或替换解析器
    pub fn register_resolution<F>(&mut self, name: impl Into<String>, resolution: F)
    where
        F: Fn(&RouteMatch) -> anyhow::Result<Resolved> + Send + Sync + 'static,
    {
        self.dispatcher.register(name, resolution);
    }

    /// 只查找路由，不派发
    pub fn resolve(&mut self, fragment: &str) -> Option<RouteMatch> {
        self.table.resolve(normalize_fragment(fragment))
    }

    /// 路由表
    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    // ==================== 执行与派发 ====================

    /// 进入初始位置：记录识别器的起点并执行初始片段
    pub fn start(
        &mut self,
        hash: &str,
        history_length: usize,
        state_token: Option<u64>,
    ) -> Result<GateOutcome<DispatchRecord>> {
        let fragment = normalize_fragment(hash).to_string();
        self.detector.seed(
            &HashObservation::new(&fragment, history_length).with_state_token(state_token),
        );
        self.execute(&fragment)
    }

    /// 执行片段对应的路由
    ///
    /// 先经过离开确认闸门；无论是否放行，都会把当前片段压入历史并发出
    /// `route.<name>` 与 `route` 事件。解析器返回的错误原样传出。
    #[instrument(skip(self))]
    pub fn execute(&mut self, fragment: &str) -> Result<GateOutcome<DispatchRecord>> {
        let fragment = normalize_fragment(fragment).to_string();
        self.trigger_route(fragment, true)
    }

    fn trigger_route(
        &mut self,
        fragment: String,
        record_history: bool,
    ) -> Result<GateOutcome<DispatchRecord>> {
        let matched = self
            .table
            .resolve(&fragment)
            .ok_or_else(|| RouterError::NoRouteMatched(fragment.clone()))?;

        debug!(
            pattern = %matched.pattern,
            resolution = %matched.resolution,
            order = matched.order,
            "片段已解析"
        );

        self.fragment = fragment;
        self.stats.record(StatKind::RouteTriggered);

        let outcome = match self.admit(PendingAction::Route(matched.clone()), true)? {
            Admission::Proceed(_) => GateOutcome::Completed(self.run_route(&matched)?),
            Admission::AwaitingConfirm => GateOutcome::AwaitingConfirm,
            Admission::Blocked => GateOutcome::Blocked,
        };

        self.finish_route(&matched, record_history);
        Ok(outcome)
    }

    /// 直接派发：覆盖最近一次派发记录并发出 `routed` 事件
    pub fn dispatch(&mut self, record: DispatchRecord) {
        info!(
            controller = record.controller.as_deref().unwrap_or("null"),
            action = record.action.as_deref().unwrap_or("null"),
            "派发"
        );
        let event = Event::new(router_events::ROUTED, record.to_value());
        self.last = Some(record);
        self.stats.record(StatKind::Dispatched);
        self.events.publish(&event);
    }

    /// 经过确认闸门执行调用方动作
    ///
    /// `navigate_back` 为真时，用户取消会静默回到上一个历史片段。
    pub fn confirm_then<F>(&mut self, navigate_back: bool, action: F) -> Result<GateOutcome<()>>
    where
        F: FnOnce(&mut Router) -> Result<()> + Send + 'static,
    {
        match self.admit(PendingAction::Custom(Box::new(action)), navigate_back)? {
            Admission::Proceed(pending) => {
                self.run_pending(pending)?;
                Ok(GateOutcome::Completed(()))
            }
            Admission::AwaitingConfirm => Ok(GateOutcome::AwaitingConfirm),
            Admission::Blocked => Ok(GateOutcome::Blocked),
        }
    }

    /// 用户确认离开
    ///
    /// 解除离开确认；挂起动作未被重入取消时执行它，挂起的是路由则返回派发记录。
    pub fn confirm_pending(&mut self) -> Result<Option<DispatchRecord>> {
        if !self.gate.is_displayed() {
            return Ok(None);
        }

        let proceed = self.gate.confirm();
        let pending = self.pending.take();
        if !proceed {
            info!("挂起的动作已被取消，确认后不再执行");
            return Ok(None);
        }

        match pending {
            Some(pending) => self.run_pending(pending.action),
            None => Ok(None),
        }
    }

    /// 用户取消离开；返回是否存在展示中的提示
    pub fn cancel_pending(&mut self) -> Result<bool> {
        if !self.gate.cancel() {
            return Ok(false);
        }

        warn!("用户取消离开");
        self.stats.record(StatKind::Canceled);
        if let Some(pending) = self.pending.take() {
            if pending.navigate_back {
                self.navigate_back(NavigateOptions::silent())?;
            }
        }
        Ok(true)
    }

    fn admit(&mut self, action: PendingAction, navigate_back: bool) -> Result<Admission> {
        match self.gate.check() {
            GateCheck::Proceed => Ok(Admission::Proceed(action)),
            GateCheck::AskConfirm(prompt) => {
                debug!(message = %prompt.message, "等待离开确认");
                self.stats.record(StatKind::ConfirmPrompt);
                self.pending = Some(Pending {
                    action,
                    navigate_back,
                });
                self.confirm_dialog.show(&prompt);
                Ok(Admission::AwaitingConfirm)
            }
            GateCheck::Reentered => {
                warn!("确认提示展示期间再次导航，强制后退");
                self.stats.record(StatKind::ReentrantBlock);
                self.navigate_back(NavigateOptions::silent())?;
                Ok(Admission::Blocked)
            }
        }
    }

    fn run_pending(&mut self, action: PendingAction) -> Result<Option<DispatchRecord>> {
        match action {
            PendingAction::Route(matched) => self.run_route(&matched).map(Some),
            PendingAction::Custom(action) => {
                action(self)?;
                Ok(None)
            }
        }
    }

    fn run_route(&mut self, matched: &RouteMatch) -> Result<DispatchRecord> {
        let resolved = self.dispatcher.resolve(matched)?;
        let record = resolved.record.clone();
        self.dispatch(resolved.record);

        if let Some(follow_up) = resolved.follow_up {
            self.navigate(&follow_up.fragment, follow_up.options)?;
        }
        Ok(record)
    }

    fn finish_route(&mut self, matched: &RouteMatch, record_history: bool) {
        let args = matched.args();
        self.events.publish(&Event::new(
            router_events::route_named(&matched.resolution),
            json!({ "args": args }),
        ));
        if record_history {
            self.history.push(self.fragment.clone());
        }
        self.events.publish(&Event::new(
            router_events::ROUTE,
            json!({ "name": matched.resolution, "args": args }),
        ));
    }

    // ==================== 导航 ====================

    /// 导航到片段
    ///
    /// 先压入历史再改写地址。`trigger` 为真且片段与当前不同时执行路由，
    /// 此时不会再次压栈。未触发路由时返回 `None`。
    pub fn navigate(
        &mut self,
        fragment: &str,
        options: NavigateOptions,
    ) -> Result<Option<GateOutcome<DispatchRecord>>> {
        let fragment = normalize_fragment(fragment).to_string();
        self.stats.record(StatKind::Navigation);
        self.history.push(fragment.clone());

        let changed = fragment != self.fragment;
        self.fragment = fragment.clone();
        self.navigator.navigate(&fragment, options);

        if !(options.trigger && changed) {
            return Ok(None);
        }

        self.trigger_route(fragment, false).map(Some)
    }

    /// 导航到上一个历史片段（只有一项时为该项本身）
    ///
    /// 历史为空时不做任何事并返回 `false`。
    pub fn navigate_back(&mut self, options: NavigateOptions) -> Result<bool> {
        let target = match self.history.back_target() {
            Some(target) => target.to_string(),
            None => return Ok(false),
        };
        debug!(target = %target, "导航后退");
        self.navigate(&target, options)?;
        Ok(true)
    }

    /// 平台 hash 变化入口
    ///
    /// 先交给前进/后退识别器，再在片段与当前不同时执行路由。
    pub fn handle_hash_change(
        &mut self,
        hash: &str,
        history_length: usize,
        state_token: Option<u64>,
    ) -> Result<Option<GateOutcome<DispatchRecord>>> {
        let fragment = normalize_fragment(hash).to_string();
        let observation =
            HashObservation::new(&fragment, history_length).with_state_token(state_token);

        match self.detector.observe(&observation) {
            Some(NavigationDirection::Back) => {
                debug!(direction = %NavigationDirection::Back, fragment = %fragment, "识别到后退");
                self.back_processed.arm();
                self.stats.record(StatKind::BackDetected);
                self.events.publish(&Event::new(
                    router_events::HISTORY_BACK,
                    json!({ "fragment": fragment }),
                ));
            }
            Some(NavigationDirection::Forward) => {
                debug!(direction = %NavigationDirection::Forward, fragment = %fragment, "识别到前进");
                self.stats.record(StatKind::ForwardDetected);
                self.events.publish(&Event::new(
                    router_events::HISTORY_FORWARD,
                    json!({ "fragment": fragment }),
                ));
            }
            None => {}
        }

        if fragment == self.fragment {
            return Ok(None);
        }
        self.execute(&fragment).map(Some)
    }

    // ==================== 状态查询 ====================

    /// 设置是否需要离开确认
    pub fn set_confirm_required(&mut self, required: bool) {
        debug!(required, "设置离开确认");
        self.gate.set_required(required);
    }

    /// 是否需要离开确认
    pub fn confirm_required(&self) -> bool {
        self.gate.is_required()
    }

    /// 替换确认提示内容
    pub fn set_confirm_prompt(&mut self, prompt: ConfirmPrompt) {
        self.gate.set_prompt(prompt);
    }

    /// 闸门状态
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// 页面卸载时的提示语
    pub fn leave_warning(&self) -> Option<&str> {
        self.gate.leave_warning()
    }

    /// 是否处于后退识别后的短暂窗口内
    pub fn is_back_processed(&self) -> bool {
        self.back_processed.is_set()
    }

    /// 当前地址，形如 `#Account/view/1`
    pub fn get_current_url(&self) -> String {
        format!("#{}", self.fragment)
    }

    /// 当前片段
    pub fn current_fragment(&self) -> &str {
        &self.fragment
    }

    /// 最近一次派发
    pub fn get_last(&self) -> Option<&DispatchRecord> {
        self.last.as_ref()
    }

    /// 导航历史
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// 配置
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// 统计快照
    pub fn stats(&self) -> NavigationStatsSnapshot {
        self.stats.snapshot()
    }

    /// 重置统计
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    // ==================== 事件 ====================

    /// 订阅路由事件
    pub fn subscribe(&mut self, pattern: &str, callback: EventCallback) -> String {
        self.events.subscribe(pattern, callback)
    }

    /// 取消订阅
    pub fn unsubscribe(&mut self, subscription_id: &str) -> Result<()> {
        self.events.unsubscribe(subscription_id)
    }
}
