//! Error taxonomy for the translation pipeline.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// What: All failure modes of the translation pipeline.
///
/// Details:
/// - Hard errors (`InvalidLanguageName`, `DirectoryNotFound`, `PermissionDenied`,
///   `Compile`) propagate to the caller of [`crate::registry::LanguageRegistry::get`]
///   and [`crate::compiler::compile`].
/// - Cache errors (`CacheRead`, `CacheWrite`) are always downgraded to logged
///   warnings at the registry/compiler boundary; caching is an optimization,
///   never a correctness dependency.
/// - `InvalidKey` and anything surfacing inside `translate` is caught at the
///   [`crate::translator::Translator`] boundary and converted to an absent result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Language name does not match `^[a-z]{2}(-[a-z]{2})?$` after lowercasing.
    #[error("invalid language name: '{0}'")]
    InvalidLanguageName(String),

    /// Translation key contains characters outside `a-z0-9.-_`.
    #[error("invalid translation key: '{0}'")]
    InvalidKey(String),

    /// Per-language source directory does not exist under the translations root.
    #[error("language directory '{0}' not found")]
    DirectoryNotFound(String),

    /// Directory or file exists but lacks the required read or write access.
    #[error("insufficient permissions for '{0}'")]
    PermissionDenied(String),

    /// A single source file failed to parse as YAML.
    #[error("failed to parse '{file}' for language '{language}': {detail}")]
    Parse {
        /// Language being compiled when parsing failed.
        language: String,
        /// Source file name (e.g. `messages.yml`).
        file: String,
        /// Parser error message.
        detail: String,
    },

    /// Compilation of a language aborted; wraps parse failures and the
    /// zero-files-loaded case.
    #[error("failed to compile language '{language}': {detail}")]
    Compile {
        /// Language that failed to compile.
        language: String,
        /// Reason the compile aborted.
        detail: String,
    },

    /// A persisted cache entry exists but is unreadable or corrupt. Distinct
    /// from a plain miss, which is not an error.
    #[error("cached language file '{file}' could not be used: {detail}")]
    CacheRead {
        /// Cache file name.
        file: String,
        /// What made the entry unusable.
        detail: String,
    },

    /// Persisting a compiled dictionary to the cache failed.
    #[error("failed to store '{file}' in cache directory: {detail}")]
    CacheWrite {
        /// Cache file name.
        file: String,
        /// Underlying I/O or serialization message.
        detail: String,
    },

    /// An error raised while resolving the fallback language, kept separate so
    /// logs distinguish it from primary-language failures.
    #[error("[fallback] {0}")]
    Fallback(Box<Error>),

    /// `translate` was called without an explicit language while no current
    /// language has been set.
    #[error("no default language has been set")]
    NoLanguageSet,

    /// A global lookup helper was called before [`crate::globals::init`].
    #[error("global translator has not been initialized")]
    GlobalNotInitialized,

    /// [`crate::globals::init`] was called twice.
    #[error("global translator has already been initialized")]
    GlobalAlreadyInitialized,
}
