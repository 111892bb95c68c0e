//! Ordered keyword set used to build the linker's match pattern.

use std::cmp::Reverse;

/// Every known keyword, longest first.
///
/// Length is counted in characters. The sort is stable, so keywords of equal
/// length keep the order the store returned them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keywords: Vec<String>,
}

impl KeywordIndex {
    /// Build an index from keywords in store order. Empty strings are dropped.
    pub fn from_keywords<I>(keywords: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut keywords: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
        keywords.sort_by_key(|k| Reverse(k.chars().count()));
        Self { keywords }
    }

    /// Keywords in match-priority order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}
