//! # lrucache
//!
//! Bounded key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to list handle (O(1))
//! - **LRU List**: [`lrulist::List`] kept most-recently-used first (O(1) relink)
//! - **SharedCache**: one `parking_lot` mutex around index and list for use across threads
//!
//! ## Semantics
//! - `set` on a known key overwrites in place and never evicts
//! - `set` on a new key evicts at most one entry, the least recently used
//! - `get` counts as a use and refreshes recency
//! - capacity is fixed at construction; 0 is rejected with [`Error::ZeroCapacity`]
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get(&"a");
//! cache.set("c", 3);
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use lru::{Insert, LruCache};
pub use stats::{CacheStats, StatsSnapshot};
