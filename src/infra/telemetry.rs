use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const RENDER_REQUESTS_TOTAL: &str = "aitoonic_render_requests_total";
pub const RENDER_FAILURES_TOTAL: &str = "aitoonic_render_failures_total";
pub const STORE_DEGRADED_TOTAL: &str = "aitoonic_store_degraded_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every counter the crate emits. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            RENDER_REQUESTS_TOTAL,
            Unit::Count,
            "Dispatched page requests by route class and cache outcome."
        );
        describe_counter!(
            RENDER_FAILURES_TOTAL,
            Unit::Count,
            "Renderer failures answered with a 500, by route class."
        );
        describe_counter!(
            STORE_DEGRADED_TOTAL,
            Unit::Count,
            "Content store failures degraded to empty results, by operation."
        );
    });
}
