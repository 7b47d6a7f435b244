//! Translation file categories and the selection signature.

use std::collections::BTreeSet;
use std::fmt;

/// What: Logical group of translation source files within a language directory.
///
/// Details:
/// - Each category maps to one YAML source file (`<category>.yml`) and a short
///   fixed tag used to build the cache signature.
/// - Variant order is the category-name alphabetical order, so the derived
///   `Ord` yields the deterministic ordering the signature relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// General vocabulary (`dictionary.yml`).
    Dictionary,
    /// User-facing messages (`messages.yml`).
    Messages,
    /// Anything that fits nowhere else (`misc.yml`).
    Misc,
    /// Page titles and navigation labels (`sitemap.yml`).
    Sitemap,
}

impl Category {
    /// All known categories in name order.
    pub const ALL: [Self; 4] = [Self::Dictionary, Self::Messages, Self::Misc, Self::Sitemap];

    /// Category name as it appears on disk (without extension).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Messages => "messages",
            Self::Misc => "misc",
            Self::Sitemap => "sitemap",
        }
    }

    /// Source file name within a language directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary.yml",
            Self::Messages => "messages.yml",
            Self::Misc => "misc.yml",
            Self::Sitemap => "sitemap.yml",
        }
    }

    /// Short fixed tag contributed to the selection signature.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Dictionary => "dkn",
            Self::Messages => "msg",
            Self::Misc => "msc",
            Self::Sitemap => "stm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What: Accumulates which file categories are active for the next compile and
/// derives the stable composite signature from the active set.
///
/// Details:
/// - The signature is the concatenation of tags sorted by category name, so
///   the same logical selection always yields the same signature (and the
///   same cache entry) regardless of activation order.
/// - Reset at the start of every [`crate::translator::Translator::load`] call.
#[derive(Debug, Default, Clone)]
pub struct FileSelector {
    active: BTreeSet<Category>,
}

impl FileSelector {
    /// Create an empty selector with no active categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Mark a category as active. Idempotent.
    pub fn activate(&mut self, category: Category) -> &mut Self {
        self.active.insert(category);
        self
    }

    /// Activate the [`Category::Dictionary`] file.
    pub fn dictionary(&mut self) -> &mut Self {
        self.activate(Category::Dictionary)
    }

    /// Activate the [`Category::Messages`] file.
    pub fn messages(&mut self) -> &mut Self {
        self.activate(Category::Messages)
    }

    /// Activate the [`Category::Sitemap`] file.
    pub fn sitemap(&mut self) -> &mut Self {
        self.activate(Category::Sitemap)
    }

    /// Activate the [`Category::Misc`] file.
    pub fn misc(&mut self) -> &mut Self {
        self.activate(Category::Misc)
    }

    /// Clear all active categories.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    /// Active categories sorted by category name.
    #[must_use]
    pub fn active_categories(&self) -> Vec<Category> {
        self.active.iter().copied().collect()
    }

    /// `true` when no category is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// What: Derive the selection signature.
    ///
    /// Output:
    /// - Concatenation of the active categories' tags, sorted by category name
    ///   (e.g. dictionary+messages → "dknmsg"); empty string when nothing is
    ///   active
    #[must_use]
    pub fn signature(&self) -> String {
        self.active.iter().map(|c| c.tag()).collect()
    }
}
