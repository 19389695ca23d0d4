//! Content languages.

use serde::{Deserialize, Serialize};

/// A content language known to the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// Canonical name as stored in search documents (e.g. `en`, `da-DK`)
    pub name: String,
}

/// Resolves language names to known languages
pub trait LanguageRegistry: Send + Sync {
    /// `None` for unknown names
    fn resolve(&self, name: &str) -> Option<Language>;
}

/// Registry over a fixed list of language names, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageRegistry {
    languages: Vec<Language>,
}

impl StaticLanguageRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: names
                .into_iter()
                .map(|n| Language { name: n.into() })
                .collect(),
        }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }
}

impl LanguageRegistry for StaticLanguageRegistry {
    fn resolve(&self, name: &str) -> Option<Language> {
        let name = name.trim();
        self.languages
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}
