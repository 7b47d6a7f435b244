//! Phrasebook: lazily compiled, disk-cached translation dictionaries.
//!
//! This crate resolves a translation key (plus an optional language code) to
//! a localized string, backed by an in-memory dictionary compiled from
//! per-language YAML source files.
//!
//! # Overview
//!
//! The pipeline has three tiers:
//! - **Memoization**: the [`registry::LanguageRegistry`] keeps each compiled
//!   language in memory for the lifetime of one load session
//! - **Disk Cache**: the [`cache::DiskCache`] persists compiled dictionaries
//!   as JSON keyed by `(language, selection signature)`, so repeated runs
//!   skip parsing entirely
//! - **Compiler**: [`compiler::compile`] reads the selected YAML files from
//!   the language's source directory, flattens the nested mappings into
//!   dot-notation keys, and validates every entry
//!
//! Lookups go through the [`Translator`] façade, which holds a current and
//! an optional fallback language and applies the two-level lookup policy:
//! the fallback is consulted only when the current language lacks the key,
//! and skipped when both resolve to the same language.
//!
//! # Source Files
//!
//! Translations live in `<root>/<language>/<category>.yml`, one directory
//! per language (`en`, `en-us`, ...), one YAML file per active
//! [`Category`]. Nested structure is flattened into dot-notation keys:
//!
//! ```yaml
//! app:
//!   titles:
//!     search: "Search"
//! ```
//!
//! becomes accessible as `app.titles.search`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use phrasebook::Translator;
//!
//! # fn main() -> phrasebook::Result<()> {
//! let mut translator = Translator::new("translations").with_cache_dir("cache")?;
//! translator.load().dictionary().messages();
//! translator.set_language("en")?;
//! translator.set_fallback("fr")?;
//!
//! assert_eq!(translator.translate("app.titles.search", None).as_deref(), Some("Search"));
//! let label = translator.translate_or_key("app.titles.help", None);
//! let toast = translator.translate_formatted("app.toasts.exported", &[&"/tmp/out"], None);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - [`Translator::translate`] never returns an error and never panics;
//!   invalid keys, missing languages and compile failures are logged via
//!   `tracing` and degrade to an absent result
//! - Cache read/write failures are downgraded to warnings everywhere;
//!   caching is an optimization, never a correctness dependency
//! - A compile failure (missing directory, unparsable file) is a hard error
//!   for [`registry::LanguageRegistry::get`]; a single bad file aborts the
//!   whole compile so no partial dictionary is ever served

pub mod cache;
pub mod compiler;
pub mod dictionary;
pub mod error;
pub mod globals;
pub mod registry;
pub mod selector;
pub mod translator;

pub use crate::cache::{DiskCache, LanguageCache};
pub use crate::dictionary::Dictionary;
pub use crate::error::{Error, Result};
pub use crate::selector::{Category, FileSelector};
pub use crate::translator::Translator;
