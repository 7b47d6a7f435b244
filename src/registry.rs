//! In-process memoization of compiled languages.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::LanguageCache;
use crate::compiler;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::selector::FileSelector;

/// What: Validate and normalize a language name.
///
/// Inputs:
/// - `given`: Raw language name in any case (e.g. "EN-us")
///
/// Output:
/// - Lowercased name matching `^[a-z]{2}(-[a-z]{2})?$` (e.g. "en-us")
///
/// # Errors
/// - Returns [`Error::InvalidLanguageName`] for anything else
pub fn validate_language_name(given: &str) -> Result<String> {
    let name = given.to_lowercase();
    let bytes = name.as_bytes();
    let valid = match bytes.len() {
        2 => bytes.iter().all(u8::is_ascii_lowercase),
        5 => {
            bytes[2] == b'-'
                && bytes[..2].iter().all(u8::is_ascii_lowercase)
                && bytes[3..].iter().all(u8::is_ascii_lowercase)
        }
        _ => false,
    };

    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidLanguageName(given.to_string()))
    }
}

/// What: Memoization tier over the disk cache and the compiler.
///
/// Details:
/// - Per language the lookup order is: memo hit, disk cache hit, compile.
///   A disk cache read error is logged as a warning and treated as a miss;
///   a compile failure propagates as a hard error.
/// - The memo lock is held across the whole miss path, so concurrent `get`
///   calls for the same uncached (language, signature) block on the first
///   compile: at most one compile runs per key.
/// - Must be [`reset`](Self::reset) whenever the active file selection
///   changes; a memoized dictionary built under a different signature would
///   serve translations for the wrong file set.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: Mutex<HashMap<String, Arc<Dictionary>>>,
}

impl LanguageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Return the dictionary for `name`, resolving through the memo,
    /// the disk cache, and finally the compiler.
    ///
    /// Inputs:
    /// - `name`: Validated language name
    /// - `root`: Translations root directory
    /// - `selector`: Current file selection (drives the cache signature)
    /// - `cache`: Optional disk cache tier
    ///
    /// # Errors
    /// - Propagates [`Error::DirectoryNotFound`], [`Error::PermissionDenied`]
    ///   and [`Error::Compile`] from the compiler; cache read errors never
    ///   propagate
    pub fn get(
        &self,
        name: &str,
        root: &Path,
        selector: &FileSelector,
        cache: Option<&dyn LanguageCache>,
    ) -> Result<Arc<Dictionary>> {
        let mut memo = lock(&self.languages);

        if let Some(dictionary) = memo.get(name) {
            return Ok(Arc::clone(dictionary));
        }

        if let Some(cache) = cache {
            match cache.get(name, &selector.signature()) {
                Ok(Some(dictionary)) => {
                    let dictionary = Arc::new(dictionary);
                    memo.insert(name.to_string(), Arc::clone(&dictionary));
                    return Ok(dictionary);
                }
                Ok(None) => {}
                Err(e) => {
                    // Corrupt or unreadable entry: fall through to a
                    // recompile, but surface the anomaly to the operator.
                    tracing::warn!(language = name, error = %e, "Cache read failed, recompiling");
                }
            }
        }

        let (dictionary, _diagnostics) = compiler::compile(name, root, selector, cache)?;
        let dictionary = Arc::new(dictionary);
        memo.insert(name.to_string(), Arc::clone(&dictionary));
        Ok(dictionary)
    }

    /// What: Drop all memoized dictionaries.
    ///
    /// Details:
    /// - Required whenever the active file selection changes; the signature
    ///   embedded in a memoized dictionary must match the current selection.
    pub fn reset(&self) {
        lock(&self.languages).clear();
    }

    /// Number of memoized languages.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.languages).len()
    }

    /// `true` when nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.languages).is_empty()
    }
}

/// Acquire a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
