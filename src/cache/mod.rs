//! Render-mode dispatch and response cache.
//!
//! Every page request is classified against an ordered route table:
//!
//! - **Fresh** routes (admin, login, search, compare) are rendered on every
//!   request and never touch the cache.
//! - **Static** routes (home, listings, info pages) are cached for a long TTL.
//! - **Dynamic** routes (everything else, e.g. tool and agent detail pages)
//!   are cached for a short TTL.
//!
//! Expiry is lazy: an entry is compared against its class TTL when it is read
//! and re-rendered when stale. Entries are only ever overwritten.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! static_ttl_seconds = 3600
//! dynamic_ttl_seconds = 300
//! ```

mod clock;
mod dispatcher;
mod lock;
mod policy;
mod routes;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::{CacheOutcome, DispatchBody, Dispatched, RenderDispatcher};
pub use policy::TtlPolicy;
pub use routes::{
    DEFAULT_ROUTE_RULES, MatchKind, RouteClass, RouteRule, RouteTable, canonical_path,
};
pub use store::{CacheEntry, ResponseCache, is_fresh};
