//! Route classification table.
//!
//! The table is plain data so it can be inspected and tested without a
//! dispatcher. Classification applies class precedence rather than row order:
//! any matching Fresh rule wins, then any matching Static rule, and every
//! other path falls back to Dynamic.
//!
//! Rules match against [`canonical_path`], the same decoded form the site
//! renderer routes on, so `/%61dmin` and `/categories/` classify like
//! `/admin` and `/categories`.

use std::{borrow::Cow, fmt};

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Rendered on every request, never cached.
    Fresh,
    /// Cached for the long TTL.
    StaticCacheable,
    /// Cached for the short TTL.
    DynamicCacheable,
}

impl RouteClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::Fresh => "fresh",
            RouteClass::StaticCacheable => "static",
            RouteClass::DynamicCacheable => "dynamic",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Matches the pattern itself and anything below it (`/admin`, `/admin/tools`),
    /// but not siblings that merely share characters (`/administrator`).
    Prefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub kind: MatchKind,
    pub pattern: &'static str,
    pub class: RouteClass,
}

impl RouteRule {
    pub const fn exact(pattern: &'static str, class: RouteClass) -> Self {
        Self {
            kind: MatchKind::Exact,
            pattern,
            class,
        }
    }

    pub const fn prefix(pattern: &'static str, class: RouteClass) -> Self {
        Self {
            kind: MatchKind::Prefix,
            pattern,
            class,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.pattern,
            MatchKind::Prefix => {
                if self.pattern.ends_with('/') {
                    return path.starts_with(self.pattern);
                }
                path.strip_prefix(self.pattern)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            }
        }
    }
}

pub const DEFAULT_ROUTE_RULES: &[RouteRule] = &[
    RouteRule::prefix("/admin", RouteClass::Fresh),
    RouteRule::prefix("/login", RouteClass::Fresh),
    RouteRule::prefix("/search", RouteClass::Fresh),
    RouteRule::prefix("/compare", RouteClass::Fresh),
    RouteRule::exact("/", RouteClass::StaticCacheable),
    RouteRule::exact("/categories", RouteClass::StaticCacheable),
    RouteRule::exact("/ai-agent", RouteClass::StaticCacheable),
    RouteRule::exact("/about", RouteClass::StaticCacheable),
    RouteRule::exact("/contact", RouteClass::StaticCacheable),
    RouteRule::exact("/terms", RouteClass::StaticCacheable),
    RouteRule::exact("/privacy", RouteClass::StaticCacheable),
    RouteRule::exact("/advertise", RouteClass::StaticCacheable),
    RouteRule::exact("/affiliate", RouteClass::StaticCacheable),
    RouteRule::exact("/sitemap", RouteClass::StaticCacheable),
];

#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: impl Into<Vec<RouteRule>>) -> Self {
        Self {
            rules: rules.into(),
        }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Classify a request target. Any query string is ignored.
    pub fn classify(&self, target: &str) -> RouteClass {
        let path = canonical_path(target);
        let path = &*path;
        [RouteClass::Fresh, RouteClass::StaticCacheable]
            .into_iter()
            .find(|class| {
                self.rules
                    .iter()
                    .any(|rule| rule.class == *class && rule.matches(path))
            })
            .unwrap_or(RouteClass::DynamicCacheable)
    }

    /// Paths of every exact Static rule, i.e. the pages a static export must emit.
    pub fn static_paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules
            .iter()
            .filter(|rule| rule.class == RouteClass::StaticCacheable && rule.kind == MatchKind::Exact)
            .map(|rule| rule.pattern)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_RULES)
    }
}

/// Path component of `target`, percent-decoded and without trailing slashes.
/// The root stays `/`. Invalid UTF-8 is decoded lossily.
pub fn canonical_path(target: &str) -> Cow<'_, str> {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let decoded = percent_decode_str(&target[..end]).decode_utf8_lossy();
    let trimmed = decoded.trim_end_matches('/');

    if trimmed.is_empty() {
        Cow::Borrowed("/")
    } else if trimmed.len() == decoded.len() {
        decoded
    } else {
        Cow::Owned(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths_are_fresh() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/admin"), RouteClass::Fresh);
        assert_eq!(table.classify("/admin/tools/new"), RouteClass::Fresh);
        assert_eq!(table.classify("/search?q=writer"), RouteClass::Fresh);
        assert_eq!(table.classify("/compare/a-vs-b"), RouteClass::Fresh);
    }

    #[test]
    fn listing_pages_are_static() {
        let table = RouteTable::default();
        for path in ["/", "/categories", "/ai-agent", "/about", "/sitemap"] {
            assert_eq!(table.classify(path), RouteClass::StaticCacheable, "{path}");
        }
    }

    #[test]
    fn detail_pages_fall_back_to_dynamic() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/ai/some-tool"), RouteClass::DynamicCacheable);
        assert_eq!(table.classify("/ai-agent/helper"), RouteClass::DynamicCacheable);
        assert_eq!(table.classify("/category/writing"), RouteClass::DynamicCacheable);
        assert_eq!(table.classify("/unknown"), RouteClass::DynamicCacheable);
    }

    #[test]
    fn query_string_does_not_change_class() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/?ref=ad"), RouteClass::StaticCacheable);
    }

    #[test]
    fn fresh_beats_static_regardless_of_row_order() {
        let table = RouteTable::new(vec![
            RouteRule::prefix("/docs", RouteClass::StaticCacheable),
            RouteRule::prefix("/docs/admin", RouteClass::Fresh),
        ]);

        assert_eq!(table.classify("/docs/admin/users"), RouteClass::Fresh);
        assert_eq!(table.classify("/docs/intro"), RouteClass::StaticCacheable);
    }

    #[test]
    fn prefix_respects_segment_boundaries() {
        let rule = RouteRule::prefix("/admin", RouteClass::Fresh);
        assert!(rule.matches("/admin"));
        assert!(rule.matches("/admin/"));
        assert!(!rule.matches("/administrator"));

        let slash = RouteRule::prefix("/static/", RouteClass::StaticCacheable);
        assert!(slash.matches("/static/app.css"));
    }

    #[test]
    fn canonical_path_decodes_and_trims() {
        assert_eq!(canonical_path("/"), "/");
        assert_eq!(canonical_path("//"), "/");
        assert_eq!(canonical_path("/categories/?page=2"), "/categories");
        assert_eq!(canonical_path("/%61dmin/tools"), "/admin/tools");
        assert_eq!(canonical_path("/ai/chat%20gpt#top"), "/ai/chat gpt");
    }

    #[test]
    fn encoded_fresh_paths_stay_fresh() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/%61dmin/tools"), RouteClass::Fresh);
        assert_eq!(table.classify("/admin%2Ftools"), RouteClass::Fresh);
        assert_eq!(table.classify("/%73earch?q=x"), RouteClass::Fresh);
    }

    #[test]
    fn trailing_slash_keeps_static_class() {
        let table = RouteTable::default();
        for path in ["/categories/", "/about/", "/ai-agent/", "/sitemap//"] {
            assert_eq!(table.classify(path), RouteClass::StaticCacheable, "{path}");
        }
    }

    #[test]
    fn exact_root_does_not_swallow_everything() {
        let table = RouteTable::default();
        assert_ne!(table.classify("/ai/x"), RouteClass::StaticCacheable);
    }

    #[test]
    fn static_paths_lists_exact_static_rules() {
        let table = RouteTable::default();
        let paths: Vec<_> = table.static_paths().collect();
        assert!(paths.contains(&"/"));
        assert!(paths.contains(&"/sitemap"));
        assert!(!paths.contains(&"/admin"));
    }
}
