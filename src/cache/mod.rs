//! Disk-level caching of compiled dictionaries.
//!
//! Caching is pure infrastructure: a miss triggers a recompile, a read error
//! is downgraded to a warning by the registry, and a write error never fails
//! a compile. Any implementation of [`LanguageCache`] can replace the
//! bundled [`DiskCache`].

mod disk;

pub use disk::DiskCache;

use crate::dictionary::Dictionary;
use crate::error::Result;

/// What: Build the deterministic cache key for a (language, signature) pair.
///
/// Output:
/// - `lang.<name>.<signature>.cache`
///
/// Details:
/// - Repeated runs with the same inputs must produce the same key so prior
///   cache entries are reused; implementations must not deviate from this
///   naming.
#[must_use]
pub fn cache_file_name(name: &str, signature: &str) -> String {
    format!("lang.{name}.{signature}.cache")
}

/// Persistence tier for compiled dictionaries, keyed by (language, signature).
pub trait LanguageCache: Send + Sync {
    /// What: Retrieve a persisted dictionary.
    ///
    /// Output:
    /// - `Ok(Some(dictionary))` on a hit
    /// - `Ok(None)` when no entry exists (a miss is normal, not an error)
    ///
    /// # Errors
    /// - Returns [`crate::Error::CacheRead`] when an entry exists but is
    ///   unreadable, incomplete, or corrupt
    fn get(&self, name: &str, signature: &str) -> Result<Option<Dictionary>>;

    /// What: Persist a dictionary under its deterministic cache key,
    /// overwriting any existing entry.
    ///
    /// # Errors
    /// - Returns [`crate::Error::CacheWrite`] on any serialization or I/O
    ///   failure
    fn store(&self, dictionary: &Dictionary) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_name_is_deterministic() {
        assert_eq!(cache_file_name("en", "dknmsg"), "lang.en.dknmsg.cache");
        assert_eq!(cache_file_name("en", "dknmsg"), cache_file_name("en", "dknmsg"));
        assert_ne!(cache_file_name("en", "dkn"), cache_file_name("en", "msg"));
    }
}
