//! Process-wide convenience lookup surface.
//!
//! These helpers wrap one explicitly installed [`Translator`] instance; they
//! are deliberately thin and never panic. Nothing is implicitly constructed:
//! calling a lookup before [`init`] logs a warning and behaves as "no
//! translation available".

use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::translator::Translator;

static GLOBAL: OnceLock<Translator> = OnceLock::new();

/// What: Install the process-wide translator instance.
///
/// Details:
/// - Configure the translator (selection, languages, cache) before handing
///   it over; the installed instance is only reachable through shared
///   references, so lookups work but reconfiguration does not.
///
/// # Errors
/// - Returns [`Error::GlobalAlreadyInitialized`] on a second call
pub fn init(translator: Translator) -> Result<()> {
    GLOBAL
        .set(translator)
        .map_err(|_| Error::GlobalAlreadyInitialized)
}

/// What: Access the installed translator.
///
/// # Errors
/// - Returns [`Error::GlobalNotInitialized`] when [`init`] was never called
pub fn instance() -> Result<&'static Translator> {
    GLOBAL.get().ok_or(Error::GlobalNotInitialized)
}

/// What: Resolve `key` through the installed translator.
///
/// Output:
/// - The translation, or `None` when absent or when no instance is installed
#[must_use]
pub fn tr(key: &str, lang: Option<&str>) -> Option<String> {
    match instance() {
        Ok(translator) => translator.translate(key, lang),
        Err(e) => {
            tracing::warn!(key, error = %e, "Global translation lookup failed");
            None
        }
    }
}

/// What: Resolve `key`, echoing the key itself when no translation is found.
#[must_use]
pub fn tr_or_key(key: &str, lang: Option<&str>) -> String {
    tr(key, lang).unwrap_or_else(|| key.to_string())
}

/// What: Resolve `key` and substitute positional `%s` placeholders.
#[must_use]
pub fn tr_formatted(key: &str, args: &[&dyn fmt::Display], lang: Option<&str>) -> Option<String> {
    match instance() {
        Ok(translator) => translator.translate_formatted(key, args, lang),
        Err(e) => {
            tracing::warn!(key, error = %e, "Global translation lookup failed");
            None
        }
    }
}
