use std::time::Duration;

use axum::http::HeaderValue;

use super::routes::RouteClass;

pub const DEFAULT_STATIC_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_DYNAMIC_TTL: Duration = Duration::from_secs(300);

/// Per-class time-to-live for cached renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    static_ttl: Duration,
    dynamic_ttl: Duration,
}

impl TtlPolicy {
    pub fn new(static_ttl: Duration, dynamic_ttl: Duration) -> Self {
        Self {
            static_ttl,
            dynamic_ttl,
        }
    }

    pub fn ttl(&self, class: RouteClass) -> Duration {
        match class {
            RouteClass::Fresh => Duration::ZERO,
            RouteClass::StaticCacheable => self.static_ttl,
            RouteClass::DynamicCacheable => self.dynamic_ttl,
        }
    }

    /// `Cache-Control` value advertised for responses of `class`.
    pub fn cache_control(&self, class: RouteClass) -> HeaderValue {
        match class {
            RouteClass::Fresh => HeaderValue::from_static("no-store"),
            cacheable => {
                let value = format!("public, max-age={}", self.ttl(cacheable).as_secs());
                HeaderValue::from_str(&value)
                    .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
            }
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STATIC_TTL, DEFAULT_DYNAMIC_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hour_and_five_minutes() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.ttl(RouteClass::StaticCacheable), Duration::from_secs(3600));
        assert_eq!(policy.ttl(RouteClass::DynamicCacheable), Duration::from_secs(300));
        assert_eq!(policy.ttl(RouteClass::Fresh), Duration::ZERO);
    }

    #[test]
    fn cache_control_reflects_class() {
        let policy = TtlPolicy::new(Duration::from_secs(60), Duration::from_secs(5));
        assert_eq!(policy.cache_control(RouteClass::Fresh), "no-store");
        assert_eq!(
            policy.cache_control(RouteClass::StaticCacheable),
            "public, max-age=60"
        );
        assert_eq!(
            policy.cache_control(RouteClass::DynamicCacheable),
            "public, max-age=5"
        );
    }
}
