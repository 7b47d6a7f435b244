//! Compilation of per-language YAML source files into a [`Dictionary`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::cache::LanguageCache;
use crate::dictionary::{Dictionary, is_valid_key};
use crate::error::{Error, Result};
use crate::selector::FileSelector;

/// What: Non-fatal per-entry problem found while flattening source files.
///
/// Details:
/// - Diagnostics never abort a compile; the offending entry is skipped and
///   the rest of the file is kept.
/// - The compiler both logs each diagnostic and returns the collected list,
///   so callers (and tests) can inspect them without scraping logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A flattened key failed the key pattern (or a mapping key was not a
    /// string). `parent` is the dotted prefix under which it appeared, `~`
    /// at the top level.
    InvalidKey {
        /// Dotted parent prefix of the skipped entry.
        parent: String,
    },
    /// A value was neither a scalar nor a nested mapping (e.g. a sequence).
    InvalidValue {
        /// Flattened key whose value was skipped.
        key: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey { parent } => {
                write!(f, "invalid translation key in parent '{parent}'")
            }
            Self::InvalidValue { key } => {
                write!(f, "invalid translation value for key '{key}'")
            }
        }
    }
}

/// What: Compile a language into a flattened [`Dictionary`].
///
/// Inputs:
/// - `name`: Validated language code (see
///   [`crate::registry::validate_language_name`])
/// - `root`: Translations root; sources live in `<root>/<name>/`
/// - `selector`: Active file categories; must not be empty
/// - `cache`: Optional cache tier the result is persisted to
///
/// Output:
/// - The compiled dictionary plus the non-fatal diagnostics collected while
///   flattening
///
/// # Errors
/// - [`Error::DirectoryNotFound`] when `<root>/<name>` is absent
/// - [`Error::PermissionDenied`] when the language directory or a source
///   file is unreadable
/// - [`Error::Compile`] when any selected file fails to parse (a single bad
///   file aborts the whole compile; no partial dictionaries), or when the
///   selection is empty
///
/// Details:
/// - A cache store failure is logged as a warning and does not fail the
///   compile; the caller already holds a valid in-memory dictionary.
pub fn compile(
    name: &str,
    root: &Path,
    selector: &FileSelector,
    cache: Option<&dyn LanguageCache>,
) -> Result<(Dictionary, Vec<Diagnostic>)> {
    let signature = selector.signature();
    let categories = selector.active_categories();
    if categories.is_empty() || signature.is_empty() {
        return Err(Error::Compile {
            language: name.to_string(),
            detail: "no translation files selected".to_string(),
        });
    }

    let language_dir = root.join(name);
    match fs::metadata(&language_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(Error::DirectoryNotFound(name.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Error::PermissionDenied(name.to_string()));
        }
        Err(_) => return Err(Error::DirectoryNotFound(name.to_string())),
    }

    let mut entries = HashMap::new();
    let mut diagnostics = Vec::new();
    let mut loaded = 0_usize;

    for category in &categories {
        let path = language_dir.join(category.file_name());
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(Error::PermissionDenied(path.display().to_string()));
            }
            Err(e) => {
                return Err(Error::Compile {
                    language: name.to_string(),
                    detail: format!("failed to read '{}': {e}", category.file_name()),
                });
            }
        };

        let forest = parse_source(name, category.file_name(), &contents).map_err(|e| {
            Error::Compile {
                language: name.to_string(),
                detail: e.to_string(),
            }
        })?;

        flatten(&forest, "", &mut entries, &mut diagnostics);
        loaded += 1;
    }

    // Unreachable given the selection check above, but a dictionary built
    // from zero files must never be handed out.
    if loaded == 0 {
        return Err(Error::Compile {
            language: name.to_string(),
            detail: "no files were loaded".to_string(),
        });
    }

    for diagnostic in &diagnostics {
        tracing::warn!(language = name, "{diagnostic}");
    }
    tracing::debug!(
        language = name,
        signature = %signature,
        file_count = loaded,
        entry_count = entries.len(),
        "Compiled language"
    );

    let dictionary = Dictionary::new(name.to_string(), signature, entries);

    if let Some(cache) = cache
        && let Err(e) = cache.store(&dictionary)
    {
        tracing::warn!(language = name, error = %e, "Failed to cache compiled language");
    }

    Ok((dictionary, diagnostics))
}

/// What: Parse one YAML source file into its top-level mapping.
///
/// # Errors
/// - [`Error::Parse`] when the content is not valid YAML or its top level is
///   not a mapping
fn parse_source(
    language: &str,
    file: &str,
    contents: &str,
) -> Result<serde_norway::Mapping> {
    let value: serde_norway::Value =
        serde_norway::from_str(contents).map_err(|e| Error::Parse {
            language: language.to_string(),
            file: file.to_string(),
            detail: e.to_string(),
        })?;

    match value {
        serde_norway::Value::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::Parse {
            language: language.to_string(),
            file: file.to_string(),
            detail: "top level is not a mapping".to_string(),
        }),
    }
}

/// What: Recursively flatten a nested mapping into dot-notation entries.
///
/// Inputs:
/// - `mapping`: Current nesting level
/// - `parent`: Dotted key prefix accumulated so far ("" at the top level)
/// - `entries`: Map to populate
/// - `diagnostics`: Collected per-entry skips
///
/// Details:
/// - Each level builds `lower(parent + "." + child)` trimmed of leading and
///   trailing `.`/`-`/`_`, then validates it against the key pattern.
/// - Strings are stored as-is; numbers and booleans are stringified; nested
///   mappings recurse; anything else is skipped with a diagnostic.
fn flatten(
    mapping: &serde_norway::Mapping,
    parent: &str,
    entries: &mut HashMap<String, String>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let parent_label = if parent.is_empty() { "~" } else { parent };

    for (key, value) in mapping {
        let Some(key_str) = key.as_str() else {
            diagnostics.push(Diagnostic::InvalidKey {
                parent: parent_label.to_string(),
            });
            continue;
        };

        let flattened = format!("{parent}.{key_str}")
            .to_lowercase()
            .trim_matches(['.', '-', '_'])
            .to_string();
        if !is_valid_key(&flattened) {
            diagnostics.push(Diagnostic::InvalidKey {
                parent: parent_label.to_string(),
            });
            continue;
        }

        match value {
            serde_norway::Value::String(s) => {
                entries.insert(flattened, s.clone());
            }
            serde_norway::Value::Number(n) => {
                entries.insert(flattened, n.to_string());
            }
            serde_norway::Value::Bool(b) => {
                entries.insert(flattened, b.to_string());
            }
            serde_norway::Value::Mapping(nested) => {
                flatten(nested, &flattened, entries, diagnostics);
            }
            _ => {
                diagnostics.push(Diagnostic::InvalidValue { key: flattened });
            }
        }
    }
}
