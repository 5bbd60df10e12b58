//! Audio cache so repeated lines are not synthesized twice.

mod store;

pub use store::{AudioCache, CacheError, cache_key};
