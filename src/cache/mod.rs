//! Response caching over Moka.
//!
//! Repeated lookups of the same surah or ayah are served from memory instead
//! of hitting the content API again.

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::{CacheStats, TypedCache};
