//! Flattened translation dictionary for a single language.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What: Check a translation key against the key pattern.
///
/// Inputs:
/// - `key`: Dot-notation key, expected to be lowercased already
///
/// Output:
/// - `true` if the key is non-empty and every character is in `a-z0-9.-_`
///
/// Details:
/// - Keys must not start or end with a separator; the compiler trims
///   separators before validation, while `translate` rejects such keys.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_'))
        && !key.starts_with(['.', '-', '_'])
        && !key.ends_with(['.', '-', '_'])
}

/// What: Flattened key→string translation table for one language and one
/// file-selection signature.
///
/// Details:
/// - Constructed once by the compiler (or deserialized from the disk cache)
///   and never mutated afterwards; a changed file selection or language
///   produces a new `Dictionary`, never a patched one.
/// - All three fields are required on deserialization; a cache payload
///   missing any of them is rejected as corrupt rather than defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    name: String,
    signature: String,
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// What: Construct a dictionary from already-flattened entries.
    ///
    /// Inputs:
    /// - `name`: Validated language code (e.g. "en", "en-us")
    /// - `signature`: File-selection signature the entries were compiled under
    /// - `entries`: Flattened dot-notation key → translated string map
    #[must_use]
    pub fn new(name: String, signature: String, entries: HashMap<String, String>) -> Self {
        Self {
            name,
            signature,
            entries,
        }
    }

    /// Language code this dictionary was compiled for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File-selection signature this dictionary was compiled under.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// What: Look up a translation by dot-notation key.
    ///
    /// Output:
    /// - `Some(&str)` with the translated value, or `None` if the key is absent
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of translation entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the dictionary holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read access to the flattened entries.
    #[must_use]
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }
}
