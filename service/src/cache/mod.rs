//! Response cache for upstream payloads.
//!
//! - [`CacheStore`] - moka-backed cache with per-entry expiry and a flush-all
//! - [`ResourceClass`] - resource kinds, each bound to a fixed TTL
//! - [`CachedUpstream`] - cache-through accessor in front of an
//!   [`UpstreamFetcher`](crate::upstream::UpstreamFetcher)
//!
//! The store is owned by the application state and handed to the accessor
//! explicitly. Nothing persists across restarts.

mod accessor;
mod policy;
mod store;

pub use accessor::CachedUpstream;
pub use policy::ResourceClass;
pub use store::{spawn_sweeper, CacheStore};
