//! Translator façade: language selection, lazy resolution, two-level lookup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::cache::{DiskCache, LanguageCache};
use crate::dictionary::{Dictionary, is_valid_key};
use crate::error::{Error, Result};
use crate::registry::{LanguageRegistry, lock, validate_language_name};
use crate::selector::FileSelector;

/// A language selection that is either still a name or already resolved to
/// a compiled dictionary. Resolution happens once, on first use.
#[derive(Debug, Clone)]
enum Slot {
    /// Name stored by `set_language`/`set_fallback`; not compiled yet.
    Unresolved(String),
    /// Dictionary resolved through the registry, cached for the session.
    Resolved(Arc<Dictionary>),
}

impl Slot {
    /// Language name regardless of resolution state.
    fn name(&self) -> String {
        match self {
            Self::Unresolved(name) => name.clone(),
            Self::Resolved(dictionary) => dictionary.name().to_string(),
        }
    }
}

/// What: Façade over the whole resolution pipeline.
///
/// Details:
/// - Holds the translations root, the active file selection, an optional
///   disk cache, the language registry, and the current/fallback slots.
/// - Configuration (`set_language`, `set_fallback`, `load`) takes `&mut
///   self`; lookups take `&self` and are safe to share across threads.
/// - `translate` never returns an error and never panics; every failure is
///   logged and degrades to an absent result.
///
/// # Usage
///
/// ```rust,no_run
/// use phrasebook::Translator;
///
/// # fn main() -> phrasebook::Result<()> {
/// let mut translator = Translator::new("translations").with_cache_dir("cache")?;
/// translator.load().dictionary().messages();
/// translator.set_language("en")?;
/// translator.set_fallback("fr")?;
///
/// let greeting = translator.translate("app.greet", None);
/// # Ok(())
/// # }
/// ```
pub struct Translator {
    root: PathBuf,
    selector: FileSelector,
    cache: Option<Box<dyn LanguageCache>>,
    registry: LanguageRegistry,
    current: Mutex<Option<Slot>>,
    fallback: Mutex<Option<Slot>>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("root", &self.root)
            .field("signature", &self.selector.signature())
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// What: Create a translator over a translations root directory.
    ///
    /// Details:
    /// - No file categories are active and no cache is configured; call
    ///   [`load`](Self::load) and optionally
    ///   [`with_cache_dir`](Self::with_cache_dir) before translating.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            selector: FileSelector::new(),
            cache: None,
            registry: LanguageRegistry::new(),
            current: Mutex::new(None),
            fallback: Mutex::new(None),
        }
    }

    /// What: Enable disk caching of compiled dictionaries under `directory`.
    ///
    /// # Errors
    /// - Returns [`Error::DirectoryNotFound`] / [`Error::PermissionDenied`]
    ///   when the cache directory is unusable
    pub fn with_cache_dir(mut self, directory: impl Into<PathBuf>) -> Result<Self> {
        self.cache = Some(Box::new(DiskCache::new(directory)?));
        Ok(self)
    }

    /// Replace the cache tier with a custom [`LanguageCache`] implementation.
    #[must_use]
    pub fn with_cache(mut self, cache: impl LanguageCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Translations root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// What: Begin a new file selection, returning the selector to activate
    /// categories on.
    ///
    /// Details:
    /// - Clears the selector AND the registry memo, and demotes any resolved
    ///   current/fallback dictionary back to its name: everything compiled
    ///   under the previous selection carries the old signature and must not
    ///   be served again.
    pub fn load(&mut self) -> &mut FileSelector {
        self.registry.reset();
        self.selector.reset();
        demote(&mut lock(&self.current));
        demote(&mut lock(&self.fallback));
        &mut self.selector
    }

    /// What: Set the current language.
    ///
    /// Details:
    /// - Stores the validated name unresolved; compilation is deferred until
    ///   the first `translate` call that needs it.
    ///
    /// # Errors
    /// - Returns [`Error::InvalidLanguageName`] when `name` does not match
    ///   the language-name pattern
    pub fn set_language(&mut self, name: &str) -> Result<()> {
        let name = validate_language_name(name)?;
        *lock(&self.current) = Some(Slot::Unresolved(name));
        Ok(())
    }

    /// What: Set the fallback language, consulted only when the current
    /// language lacks a requested key.
    ///
    /// # Errors
    /// - Returns [`Error::Fallback`] wrapping the name-validation failure
    pub fn set_fallback(&mut self, name: &str) -> Result<()> {
        let name =
            validate_language_name(name).map_err(|e| Error::Fallback(Box::new(e)))?;
        *lock(&self.fallback) = Some(Slot::Unresolved(name));
        Ok(())
    }

    /// What: Name of the current language, falling back to the fallback
    /// language's name when no current language is set.
    #[must_use]
    pub fn current_language(&self) -> Option<String> {
        lock(&self.current)
            .as_ref()
            .map(Slot::name)
            .or_else(|| lock(&self.fallback).as_ref().map(Slot::name))
    }

    /// What: Resolve `key` to a translation.
    ///
    /// Inputs:
    /// - `key`: Dot-notation key; lowercased before validation
    /// - `lang`: Optional language override; `None` uses the current language
    ///
    /// Output:
    /// - `Some(translation)` from the target language, else from the fallback
    ///   language, else `None`
    ///
    /// Details:
    /// - Empty translated values are treated as absent.
    /// - The fallback is skipped when it resolves to the same language as the
    ///   target.
    /// - Never panics and never returns an error: invalid keys, missing
    ///   directories and compile failures are logged with the offending key
    ///   and converted to `None`.
    #[must_use]
    pub fn translate(&self, key: &str, lang: Option<&str>) -> Option<String> {
        match self.try_translate(key, lang) {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!(key, error = %e, "Translation error");
                None
            }
        }
    }

    /// What: Resolve `key`, echoing the key itself when no translation is
    /// found anywhere.
    #[must_use]
    pub fn translate_or_key(&self, key: &str, lang: Option<&str>) -> String {
        self.translate(key, lang)
            .unwrap_or_else(|| key.to_string())
    }

    /// What: Resolve `key` and substitute positional `%s` placeholders.
    ///
    /// Inputs:
    /// - `args`: Arguments consumed left to right, one per `%s`
    ///
    /// Output:
    /// - The formatted translation; `None` when no translation was found or
    ///   the template has more placeholders than arguments (surplus
    ///   arguments are ignored)
    ///
    /// Details:
    /// - Only `%s` consumes an argument. `%%` is an escaped percent sign;
    ///   any other `%`-sequence (e.g. `%d`) passes through to the output
    ///   verbatim and does not consume an argument.
    #[must_use]
    pub fn translate_formatted(
        &self,
        key: &str,
        args: &[&dyn fmt::Display],
        lang: Option<&str>,
    ) -> Option<String> {
        let template = self.translate(key, lang)?;
        format_positional(&template, args)
    }

    /// Fallible core of [`translate`](Self::translate).
    fn try_translate(&self, key: &str, lang: Option<&str>) -> Result<Option<String>> {
        let key = key.to_lowercase();
        if !is_valid_key(&key) {
            return Err(Error::InvalidKey(key));
        }

        let target = match lang {
            Some(given) => {
                let name = validate_language_name(given)?;
                self.registry
                    .get(&name, &self.root, &self.selector, self.cache_ref())?
            }
            None => self
                .resolve_slot(&self.current)?
                .ok_or(Error::NoLanguageSet)?,
        };

        if let Some(translation) = target.get(&key)
            && !translation.is_empty()
        {
            return Ok(Some(translation.to_string()));
        }

        let fallback = self
            .resolve_slot(&self.fallback)
            .map_err(|e| Error::Fallback(Box::new(e)))?;
        if let Some(fallback) = fallback
            && fallback.name() != target.name()
            && let Some(translation) = fallback.get(&key)
            && !translation.is_empty()
        {
            return Ok(Some(translation.to_string()));
        }

        Ok(None)
    }

    /// What: Resolve a language slot, transitioning `Unresolved(name)` to
    /// `Resolved(dictionary)` exactly once.
    ///
    /// Output:
    /// - `Ok(None)` when the slot is not set at all
    fn resolve_slot(&self, slot: &Mutex<Option<Slot>>) -> Result<Option<Arc<Dictionary>>> {
        let mut guard = lock(slot);
        let name = match &*guard {
            None => return Ok(None),
            Some(Slot::Resolved(dictionary)) => return Ok(Some(Arc::clone(dictionary))),
            Some(Slot::Unresolved(name)) => name.clone(),
        };

        let dictionary =
            self.registry
                .get(&name, &self.root, &self.selector, self.cache_ref())?;
        *guard = Some(Slot::Resolved(Arc::clone(&dictionary)));
        Ok(Some(dictionary))
    }

    fn cache_ref(&self) -> Option<&dyn LanguageCache> {
        self.cache.as_deref()
    }
}

/// Demote a resolved slot back to its unresolved name.
fn demote(slot: &mut Option<Slot>) {
    if let Some(Slot::Resolved(dictionary)) = slot {
        *slot = Some(Slot::Unresolved(dictionary.name().to_string()));
    }
}

/// What: Substitute positional `%s` placeholders in `template`.
///
/// Details:
/// - `%%` is an escaped percent sign; any other `%`-sequence is passed
///   through verbatim.
/// - Returns `None` when the template needs more arguments than were given.
fn format_positional(template: &str, args: &[&dyn fmt::Display]) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => {
                let arg = args.get(next_arg)?;
                out.push_str(&arg.to_string());
                next_arg += 1;
            }
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Fixture: `en` and `fr` language directories with overlapping and
    /// language-specific dictionary keys.
    fn fixture() -> (TempDir, Translator) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
        let root = temp_dir.path();

        let en = root.join("en");
        fs::create_dir_all(&en).expect("Failed to create language directory");
        fs::write(
            en.join("dictionary.yml"),
            "greet: \"Hello\"\nempty: \"\"\ntemplated:\n  greet_name: \"Hello, %s\"\n",
        )
        .expect("Failed to write source file");

        let fr = root.join("fr");
        fs::create_dir_all(&fr).expect("Failed to create language directory");
        fs::write(
            fr.join("dictionary.yml"),
            "greet: \"Bonjour\"\nempty: \"Rempli\"\nfarewell: \"Au revoir\"\n",
        )
        .expect("Failed to write source file");

        let mut translator = Translator::new(root);
        translator.load().dictionary();
        (temp_dir, translator)
    }

    #[test]
    fn test_translate_from_current_language() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(translator.translate("greet", None), Some("Hello".to_string()));
        assert_eq!(translator.translate("missing.key", None), None);
    }

    #[test]
    fn test_translate_falls_back_when_key_missing() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");
        translator.set_fallback("fr").expect("Failed to set fallback");

        // "farewell" exists only in fr.
        assert_eq!(
            translator.translate("farewell", None),
            Some("Au revoir".to_string())
        );
        // "greet" exists in en; the fallback must not shadow it.
        assert_eq!(translator.translate("greet", None), Some("Hello".to_string()));
    }

    #[test]
    fn test_empty_translation_is_treated_as_absent() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");
        translator.set_fallback("fr").expect("Failed to set fallback");

        // en has `empty: ""`; the fallback's non-empty value wins.
        assert_eq!(translator.translate("empty", None), Some("Rempli".to_string()));
    }

    #[test]
    fn test_fallback_skipped_when_same_as_current() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");
        translator.set_fallback("en").expect("Failed to set fallback");

        assert_eq!(translator.translate("farewell", None), None);
    }

    #[test]
    fn test_explicit_language_override() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(
            translator.translate("greet", Some("fr")),
            Some("Bonjour".to_string())
        );
        // The override must not disturb the current language.
        assert_eq!(translator.translate("greet", None), Some("Hello".to_string()));
    }

    #[test]
    fn test_invalid_key_returns_none_without_panicking() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(translator.translate("bad/key", None), None);
        assert_eq!(translator.translate("", None), None);
        assert_eq!(translator.translate(".leading", None), None);
    }

    #[test]
    fn test_key_is_lowercased_before_lookup() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(translator.translate("GREET", None), Some("Hello".to_string()));
    }

    #[test]
    fn test_no_language_set_returns_none() {
        let (_dir, translator) = fixture();
        assert_eq!(translator.translate("greet", None), None);
    }

    #[test]
    fn test_missing_language_directory_degrades_to_none() {
        let (_dir, mut translator) = fixture();
        translator.set_language("de").expect("Failed to set language");

        assert_eq!(translator.translate("greet", None), None);
    }

    #[test]
    fn test_translate_or_key_echoes_key() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(
            translator.translate_or_key("missing.key", None),
            "missing.key"
        );
        assert_eq!(translator.translate_or_key("greet", None), "Hello");
    }

    #[test]
    fn test_translate_formatted_substitutes_positionally() {
        let (_dir, mut translator) = fixture();
        translator.set_language("en").expect("Failed to set language");

        assert_eq!(
            translator.translate_formatted("templated.greet-name", &[&"Ann"], None),
            None,
            "hyphenated key must not match the underscore key"
        );
        assert_eq!(
            translator.translate_formatted("templated.greet_name", &[&"Ann"], None),
            Some("Hello, Ann".to_string())
        );
        // Too few arguments for the template.
        assert_eq!(
            translator.translate_formatted("templated.greet_name", &[], None),
            None
        );
        // Missing translation.
        assert_eq!(translator.translate_formatted("missing.key", &[&"x"], None), None);
    }

    #[test]
    fn test_set_language_validates_name() {
        let (_dir, mut translator) = fixture();
        assert!(matches!(
            translator.set_language("english"),
            Err(Error::InvalidLanguageName(_))
        ));
        assert!(matches!(
            translator.set_fallback("english"),
            Err(Error::Fallback(_))
        ));
    }

    #[test]
    fn test_current_language_reports_fallback_when_unset() {
        let (_dir, mut translator) = fixture();
        assert_eq!(translator.current_language(), None);

        translator.set_fallback("fr").expect("Failed to set fallback");
        assert_eq!(translator.current_language(), Some("fr".to_string()));

        translator.set_language("EN").expect("Failed to set language");
        assert_eq!(translator.current_language(), Some("en".to_string()));
    }

    #[test]
    fn test_reselect_does_not_reuse_stale_dictionaries() {
        let (dir, mut translator) = fixture();

        // messages.yml exists but holds different keys than dictionary.yml.
        fs::write(
            dir.path().join("en").join("messages.yml"),
            "msg:\n  hello: \"Hi there\"\n",
        )
        .expect("Failed to write source file");

        translator.set_language("en").expect("Failed to set language");
        assert_eq!(translator.translate("greet", None), Some("Hello".to_string()));

        // Switch the selection to messages only; the dictionary compiled
        // under the old selection must be dropped, not served again.
        translator.load().messages();
        assert_eq!(translator.translate("greet", None), None);
        assert_eq!(
            translator.translate("msg.hello", None),
            Some("Hi there".to_string())
        );
    }

    #[test]
    fn test_format_positional() {
        assert_eq!(
            format_positional("Hello, %s", &[&"Ann"]),
            Some("Hello, Ann".to_string())
        );
        assert_eq!(
            format_positional("%s and %s", &[&"a", &"b"]),
            Some("a and b".to_string())
        );
        // Surplus arguments are ignored.
        assert_eq!(
            format_positional("just %s", &[&"one", &"two"]),
            Some("just one".to_string())
        );
        // Shortage fails.
        assert_eq!(format_positional("%s %s", &[&"only"]), None);
        // Escaped percent and unknown sequences pass through.
        assert_eq!(format_positional("100%%", &[]), Some("100%".to_string()));
        assert_eq!(format_positional("50%x", &[]), Some("50%x".to_string()));
    }
}
