//! 路由模块
//!
//! 包含片段路由系统的核心组件：
//! - 路由模式与路由表
//! - 选项串解析
//! - 派发器
//! - 导航历史
//! - 前进/后退识别
//! - 离开确认闸门
//! - 事件与事件总线
//! - 宿主平台抽象
//! - 路由器主结构体

pub mod detector;
pub mod dispatcher;
pub mod event;
pub mod event_bus;
pub mod gate;
pub mod history;
pub mod options;
pub mod pattern;
pub mod platform;
pub mod route_table;
pub mod router;

// 重导出常用类型
pub use detector::{
    detector_for, BackProcessedFlag, HashObservation, HistoryLengthDetector, NavigationDetector,
    NavigationDirection, StateTokenDetector,
};
pub use dispatcher::{
    resolutions, DispatchRecord, Dispatcher, FollowUp, Resolved, ResolutionFn, HOME_CONTROLLER,
};
pub use event::{router_events, Event};
pub use event_bus::{EventBus, EventCallback};
pub use gate::{ConfirmPrompt, GateCheck, GateState, LeaveConfirmGate};
pub use history::{normalize_fragment, NavigationHistory};
pub use options::{parse_options, ParsedOptions};
pub use pattern::{Capture, PatternMatch, RoutePattern};
pub use platform::{
    ConfirmDialog, NavigateOptions, NavigationCall, Navigator, NullConfirmDialog, NullNavigator,
    RecordingConfirmDialog, RecordingNavigator,
};
pub use route_table::{
    RouteCache, RouteCacheStats, RouteEntry, RouteMatch, RouteTable, BUILTIN_ROUTES,
    DEFAULT_CACHE_CAPACITY,
};
pub use router::{GateOutcome, GuardedAction, Router, RouterBuilder};
