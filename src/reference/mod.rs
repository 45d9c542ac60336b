//! Display metadata (names, icons) for the numeric ids found in matches.
//!
//! The aggregator only needs champion identity; everything else is used by
//! the terminal output. Unknown ids always render as `"<Category> <id>"`.

pub mod ddragon;
pub mod names;

use std::fmt;

pub use ddragon::{Catalog, ReferenceData};
pub use names::StaticNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Item,
    Spell,
    RuneStyle,
    Keystone,
    Champion,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Item => "Item",
            Category::Spell => "Spell",
            Category::RuneStyle => "Style",
            Category::Keystone => "Keystone",
            Category::Champion => "Champion",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionMeta {
    /// Stable champion id, e.g. `MonkeyKing`.
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

pub trait ReferenceLookup: Send + Sync {
    fn entry(&self, category: Category, id: i64) -> Option<RefEntry>;

    /// Resolves a champion by numeric key first, then by name.
    fn champion(&self, name: &str, key: i64) -> Option<ChampionMeta>;

    fn label(&self, category: Category, id: i64) -> String {
        self.entry(category, id)
            .map(|e| e.name)
            .unwrap_or_else(|| fallback_label(category, id))
    }
}

pub fn fallback_label(category: Category, id: i64) -> String {
    format!("{} {}", category, id)
}

/// Lowercase ASCII letters only: "Kai'Sa", "kaisa" and "KaiSa" collide.
pub fn normalize_champion(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
