mod support;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use aitoonic::application::context::CatalogStores;
use aitoonic::application::render::{RenderError, RenderedPage, Renderer};
use aitoonic::cache::{ManualClock, RenderDispatcher, ResponseCache, RouteTable, TtlPolicy};
use aitoonic::infra::telemetry;
use async_trait::async_trait;
use axum::http::StatusCode;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use support::MemoryStore;

struct FlakyRenderer;

#[async_trait]
impl Renderer for FlakyRenderer {
    async fn render(&self, target: &str) -> Result<RenderedPage, RenderError> {
        if target == "/contact" {
            Err(RenderError::unavailable("contact page offline"))
        } else {
            Ok(RenderedPage::html(StatusCode::OK, target))
        }
    }
}

#[tokio::test]
async fn dispatch_and_degradation_emit_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let dispatcher = RenderDispatcher::new(
        RouteTable::default(),
        TtlPolicy::new(Duration::from_secs(3600), Duration::from_secs(300)),
        Arc::new(ResponseCache::new()),
        Arc::new(FlakyRenderer),
        Arc::new(ManualClock::new()),
    );
    dispatcher.handle("/").await;
    dispatcher.handle("/").await;
    dispatcher.handle("/search?q=x").await;
    dispatcher.handle("/contact").await;

    let store = Arc::new(MemoryStore::seeded());
    store.set_failing(true);
    let catalog = CatalogStores::from_store(store).catalog();
    assert!(catalog.active_agents().await.is_empty());

    let snapshot = snapshotter.snapshot().into_vec();
    let names: HashSet<String> = snapshot
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    for metric in [
        telemetry::RENDER_REQUESTS_TOTAL,
        telemetry::RENDER_FAILURES_TOTAL,
        telemetry::STORE_DEGRADED_TOTAL,
    ] {
        assert!(names.contains(metric), "missing metric: {metric}");
    }

    let counter = |name: &str, labels: &[(&str, &str)]| -> u64 {
        snapshot
            .iter()
            .filter(|(composite_key, _, _, _)| {
                let key = composite_key.key();
                key.name() == name
                    && labels.iter().all(|(label, value)| {
                        key.labels()
                            .any(|l| l.key() == *label && l.value() == *value)
                    })
            })
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(count) => *count,
                _ => 0,
            })
            .sum()
    };

    assert_eq!(
        counter(
            telemetry::RENDER_REQUESTS_TOTAL,
            &[("class", "static"), ("outcome", "hit")]
        ),
        1
    );
    assert_eq!(
        counter(
            telemetry::RENDER_REQUESTS_TOTAL,
            &[("class", "fresh"), ("outcome", "bypass")]
        ),
        1
    );
    assert_eq!(
        counter(telemetry::RENDER_FAILURES_TOTAL, &[("class", "static")]),
        1
    );
    assert!(counter(telemetry::STORE_DEGRADED_TOTAL, &[]) >= 1);
}
