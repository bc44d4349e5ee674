//! In-memory symbol directory.

use async_trait::async_trait;
use pricecast_core::{NetworkError, SearchMatch, SymbolSearch};

/// Symbol search over a fixed list of instruments.
///
/// Ranking: exact symbol, then name prefix, then symbol or name substring.
/// Ties keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbolSearch {
    entries: Vec<SearchMatch>,
}

impl StaticSymbolSearch {
    pub fn new(entries: Vec<SearchMatch>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: SearchMatch) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(entry: &SearchMatch, needle: &str) -> Option<u8> {
        let symbol = entry.symbol.to_lowercase();
        let name = entry.name.as_deref().unwrap_or_default().to_lowercase();
        if symbol == needle {
            Some(0)
        } else if !name.is_empty() && name.starts_with(needle) {
            Some(1)
        } else if symbol.contains(needle) || name.contains(needle) {
            Some(2)
        } else {
            None
        }
    }

    /// Synchronous lookup used by the trait implementation.
    pub fn lookup(&self, query: &str) -> Vec<SearchMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut ranked: Vec<(u8, usize, &SearchMatch)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| Self::rank(e, &needle).map(|r| (r, i, e)))
            .collect();
        ranked.sort_by_key(|(rank, index, _)| (*rank, *index));
        ranked.into_iter().map(|(_, _, e)| e.clone()).collect()
    }
}

#[async_trait]
impl SymbolSearch for StaticSymbolSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, NetworkError> {
        Ok(self.lookup(query))
    }

    fn name(&self) -> &str {
        "static"
    }
}
