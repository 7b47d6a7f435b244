//! Directory-backed dictionary cache using JSON payloads.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{LanguageCache, cache_file_name};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};

/// What: Persists compiled dictionaries as JSON files in a cache directory.
///
/// Details:
/// - File name per entry is the deterministic key from
///   [`cache_file_name`]; storing overwrites existing content.
/// - Payloads are validated on read: the JSON must deserialize into a
///   complete [`Dictionary`] and its embedded name/signature must match the
///   requested pair, otherwise the entry is reported as corrupt.
#[derive(Debug)]
pub struct DiskCache {
    directory: PathBuf,
}

impl DiskCache {
    /// What: Create a cache over `directory`, verifying it is usable.
    ///
    /// Details:
    /// - The directory must be both readable and writable; an unwritable
    ///   cache directory is rejected here rather than turning every later
    ///   `store` into a logged failure.
    /// - Writability is verified with a probe file that is removed again
    ///   immediately.
    ///
    /// # Errors
    /// - [`Error::DirectoryNotFound`] when `directory` does not exist or is
    ///   not a directory
    /// - [`Error::PermissionDenied`] when the directory cannot be read or
    ///   written
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        match fs::read_dir(&directory) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::DirectoryNotFound(directory.display().to_string()));
            }
            Err(_) => {
                return Err(Error::PermissionDenied(directory.display().to_string()));
            }
        }

        let probe = directory.join(".write-probe");
        if fs::write(&probe, b"").is_err() {
            return Err(Error::PermissionDenied(directory.display().to_string()));
        }
        let _ = fs::remove_file(&probe);

        Ok(Self { directory })
    }

    /// Cache directory path.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl LanguageCache for DiskCache {
    fn get(&self, name: &str, signature: &str) -> Result<Option<Dictionary>> {
        let file = cache_file_name(name, signature);
        let path = self.directory.join(&file);

        // Absence is a normal miss, never an error.
        if !path.is_file() {
            tracing::debug!(file = %file, "Cache miss for language");
            return Ok(None);
        }

        let payload = fs::read_to_string(&path).map_err(|e| Error::CacheRead {
            file: file.clone(),
            detail: e.to_string(),
        })?;

        let dictionary: Dictionary =
            serde_json::from_str(&payload).map_err(|_| Error::CacheRead {
                file: file.clone(),
                detail: "incomplete or corrupted payload".to_string(),
            })?;

        // A payload whose embedded identity disagrees with its file name would
        // serve translations compiled under a different selection.
        if dictionary.name() != name || dictionary.signature() != signature {
            return Err(Error::CacheRead {
                file,
                detail: format!(
                    "payload identity mismatch (found '{}'/'{}')",
                    dictionary.name(),
                    dictionary.signature()
                ),
            });
        }

        tracing::debug!(
            file = %file,
            entry_count = dictionary.len(),
            "Cache hit for language"
        );
        Ok(Some(dictionary))
    }

    fn store(&self, dictionary: &Dictionary) -> Result<()> {
        let file = cache_file_name(dictionary.name(), dictionary.signature());
        let payload = serde_json::to_string(dictionary).map_err(|e| Error::CacheWrite {
            file: file.clone(),
            detail: e.to_string(),
        })?;

        fs::write(self.directory.join(&file), payload).map_err(|e| Error::CacheWrite {
            file: file.clone(),
            detail: e.to_string(),
        })?;

        tracing::debug!(
            file = %file,
            entry_count = dictionary.len(),
            "Stored compiled language in cache"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn sample_dictionary() -> Dictionary {
        let mut entries = HashMap::new();
        entries.insert("app.greet".to_string(), "Hello".to_string());
        entries.insert("app.bye".to_string(), "Goodbye".to_string());
        Dictionary::new("en".to_string(), "dknmsg".to_string(), entries)
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            DiskCache::new(&missing),
            Err(Error::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_new_leaves_no_probe_file_behind() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        let leftovers = fs::read_dir(temp_dir.path())
            .expect("Failed to list cache directory")
            .count();
        assert_eq!(leftovers, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_rejects_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let mut perms = fs::metadata(temp_dir.path())
            .expect("Failed to read directory metadata")
            .permissions();
        perms.set_mode(0o555);
        fs::set_permissions(temp_dir.path(), perms.clone())
            .expect("Failed to make directory read-only");

        // Permission bits do not bind a privileged user; skip the assertion
        // when writes go through anyway (e.g. running as root in CI).
        let check = temp_dir.path().join("writable-check");
        if fs::write(&check, b"x").is_ok() {
            let _ = fs::remove_file(&check);
        } else {
            assert!(matches!(
                DiskCache::new(temp_dir.path()),
                Err(Error::PermissionDenied(_))
            ));
        }

        // Restore so TempDir can clean up.
        perms.set_mode(0o755);
        fs::set_permissions(temp_dir.path(), perms)
            .expect("Failed to restore directory permissions");
    }

    #[test]
    fn test_store_then_get_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        let dict = sample_dictionary();
        cache.store(&dict).expect("Failed to store dictionary");

        let loaded = cache
            .get("en", "dknmsg")
            .expect("Cache read failed")
            .expect("Expected a cache hit");
        assert_eq!(loaded, dict);
    }

    #[test]
    fn test_get_miss_is_ok_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        let result = cache.get("en", "dkn").expect("Miss must not be an error");
        assert!(result.is_none());
    }

    #[test]
    fn test_get_corrupt_payload_is_cache_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        let path = temp_dir.path().join(cache_file_name("en", "dkn"));
        fs::write(&path, "{ not json").expect("Failed to write corrupt cache file");

        assert!(matches!(
            cache.get("en", "dkn"),
            Err(Error::CacheRead { .. })
        ));
    }

    #[test]
    fn test_get_missing_field_is_cache_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        // Syntactically valid JSON, but the `entries` field is missing.
        let path = temp_dir.path().join(cache_file_name("en", "dkn"));
        fs::write(&path, r#"{"name":"en","signature":"dkn"}"#)
            .expect("Failed to write incomplete cache file");

        assert!(matches!(
            cache.get("en", "dkn"),
            Err(Error::CacheRead { .. })
        ));
    }

    #[test]
    fn test_get_identity_mismatch_is_cache_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        // Valid dictionary, but stored under a key it was not compiled for.
        let dict = sample_dictionary();
        let payload = serde_json::to_string(&dict).expect("Failed to serialize dictionary");
        let path = temp_dir.path().join(cache_file_name("fr", "dknmsg"));
        fs::write(&path, payload).expect("Failed to write mismatched cache file");

        assert!(matches!(
            cache.get("fr", "dknmsg"),
            Err(Error::CacheRead { .. })
        ));
    }

    #[test]
    fn test_store_overwrites_existing_entry() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let cache = DiskCache::new(temp_dir.path()).expect("Failed to open cache directory");

        cache
            .store(&sample_dictionary())
            .expect("Failed to store dictionary");

        let mut entries = HashMap::new();
        entries.insert("app.greet".to_string(), "Hi".to_string());
        let updated = Dictionary::new("en".to_string(), "dknmsg".to_string(), entries);
        cache.store(&updated).expect("Failed to overwrite dictionary");

        let loaded = cache
            .get("en", "dknmsg")
            .expect("Cache read failed")
            .expect("Expected a cache hit");
        assert_eq!(loaded.get("app.greet"), Some("Hi"));
        assert_eq!(loaded.len(), 1);
    }
}
