//! 路由系统性能基准测试
//!
//! 使用 Criterion 框架进行性能测试，包括：
//! - 路由表解析基准（有/无缓存）
//! - 不同路由表规模的解析基准
//! - 选项串解析基准
//! - 完整执行流程基准
//! - 事件发布基准

use chips_router::router::{parse_options, Event, EventBus, RouteTable, DEFAULT_CACHE_CAPACITY};
use chips_router::Router;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map};
use std::sync::Arc;

// ============================================================================
// 路由表解析基准测试
// ============================================================================

/// 内置路由表解析，对比缓存开关
fn route_table_resolve_benchmark(c: &mut Criterion) {
    let fragments = [
        "Account/view/123",
        "Account/view/123/tab=stream&expanded",
        "Lead/edit/7?returnUrl=home",
        "Opportunity/kanban",
        "Contact",
        "a/b/c/d/e",
    ];

    let mut group = c.benchmark_group("route_table_resolve");

    let mut cached = RouteTable::with_builtin_routes(DEFAULT_CACHE_CAPACITY).unwrap();
    group.bench_function("cached", |b| {
        b.iter(|| {
            for fragment in &fragments {
                black_box(cached.resolve(black_box(fragment)));
            }
        });
    });

    let mut uncached = RouteTable::with_builtin_routes(0).unwrap();
    group.bench_function("uncached", |b| {
        b.iter(|| {
            for fragment in &fragments {
                black_box(uncached.resolve(black_box(fragment)));
            }
        });
    });

    group.finish();
}

/// 调用方路由数量对解析性能的影响
fn route_table_size_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_table_size");

    for size in [10, 100, 500].iter() {
        let mut table = RouteTable::with_builtin_routes(0).unwrap();
        for i in 0..*size {
            table
                .register(&format!("Module{}/:page", i), "defaultRoute", 50, Map::new())
                .unwrap();
        }

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            // 落到兜底路由，需要检查全部条目
            let fragment = format!("Missing{}/a/b/c", size);
            b.iter(|| black_box(table.resolve(black_box(&fragment))));
        });
    }

    group.finish();
}

// ============================================================================
// 选项串解析基准测试
// ============================================================================

fn options_parse_benchmark(c: &mut Criterion) {
    c.bench_function("parse_options", |b| {
        b.iter(|| parse_options(black_box(Some("tab=stream&expanded&returnUrl=home&page=2"))));
    });
}

// ============================================================================
// 完整流程基准测试
// ============================================================================

fn router_execute_benchmark(c: &mut Criterion) {
    let mut router = Router::with_defaults().unwrap();
    c.bench_function("router_execute", |b| {
        b.iter(|| router.execute(black_box("Account/view/123/tab=stream")).unwrap());
    });
}

// ============================================================================
// 事件发布基准测试
// ============================================================================

fn event_publish_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_publish");

    for subscribers in [1, 10, 100].iter() {
        let mut bus = EventBus::new();
        for i in 0..*subscribers {
            let pattern = if i % 2 == 0 { "route.*" } else { "routed" };
            bus.subscribe(pattern, Arc::new(|event: &Event| {
                black_box(&event.data);
            }));
        }
        let event = Event::new("route.view", json!({"args": ["Account", "1"]}));

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            subscribers,
            |b, _| b.iter(|| bus.publish(black_box(&event))),
        );
    }

    group.finish();
}

// ============================================================================
// 基准测试组
// ============================================================================

criterion_group!(
    name = route_table_benches;
    config = Criterion::default().sample_size(100);
    targets = route_table_resolve_benchmark, route_table_size_benchmark
);

criterion_group!(
    name = dispatch_benches;
    config = Criterion::default().sample_size(100);
    targets = options_parse_benchmark, router_execute_benchmark
);

criterion_group!(
    name = event_benches;
    config = Criterion::default().sample_size(100);
    targets = event_publish_benchmark
);

criterion_main!(route_table_benches, dispatch_benches, event_benches);
