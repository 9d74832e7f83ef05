//! # recency
//!
//! Capacity-bounded LRU cache with O(1) `get` and `put`.
//!
//! ## Architecture
//! - **Recency List**: slot-arena doubly-linked list, least recently used at
//!   the head (O(1) relink and eviction)
//! - **Lookup Index**: AHash map from key to list handle (O(1) lookups)
//! - **LruCache**: single-threaded facade keeping index and list in step
//! - **SharedCache**: cloneable handle guarding the whole cache with one lock,
//!   plus hit/miss statistics
//! - **Trace**: text trace parser and replayer for hit-ratio experiments
//!
//! ```
//! use recency::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get("a");
//! cache.put("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some(&1));
//! # Ok::<(), recency::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
mod list;
mod lru;
mod stats;
pub mod trace;

pub use cache::SharedCache;
pub use error::{Error, Result};
pub use lru::LruCache;
pub use stats::{CacheStats, StatsSnapshot};
