//! Free-text query to ticker resolution.

use pricecast_core::{
    MarketDataProvider, PricecastError, PricecastResult, ResolvedSymbol, Symbol, SymbolSearch,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves a user query with a direct quote probe, then symbol search.
#[derive(Clone)]
pub struct SymbolResolver {
    provider: Arc<dyn MarketDataProvider>,
    search: Arc<dyn SymbolSearch>,
}

impl SymbolResolver {
    pub fn new(provider: Arc<dyn MarketDataProvider>, search: Arc<dyn SymbolSearch>) -> Self {
        Self { provider, search }
    }

    /// Resolve `query` to a validated ticker.
    ///
    /// Network failures only move on to the next strategy; the caller sees
    /// `NotFound` when both strategies come up empty.
    pub async fn resolve(&self, query: &str) -> PricecastResult<ResolvedSymbol> {
        let trimmed = query.trim();
        let not_found = || PricecastError::NotFound {
            query: query.to_string(),
        };
        if trimmed.is_empty() {
            return Err(not_found());
        }

        if let Some(symbol) = self.probe(trimmed).await {
            info!(query = trimmed, symbol = %symbol, "Resolved by direct probe");
            return Ok(ResolvedSymbol::direct(symbol));
        }

        match self.search.search(trimmed).await {
            Ok(matches) => {
                let found = matches
                    .into_iter()
                    .find_map(|m| Symbol::parse(&m.symbol).ok().map(|s| (s, m)));
                if let Some((symbol, m)) = found {
                    info!(
                        query = trimmed,
                        symbol = %symbol,
                        exchange = m.exchange.as_deref().unwrap_or("-"),
                        "Resolved by symbol search"
                    );
                    return Ok(ResolvedSymbol::searched(symbol, m.exchange, m.name));
                }
                debug!(query = trimmed, search = self.search.name(), "Search returned no usable match");
            }
            Err(err) => {
                warn!(query = trimmed, search = self.search.name(), error = %err, "Symbol search failed");
            }
        }

        Err(not_found())
    }

    async fn probe(&self, query: &str) -> Option<Symbol> {
        let symbol = match Symbol::parse(query) {
            Ok(symbol) => symbol,
            Err(err) => {
                debug!(query, error = %err, "Query is not a ticker, skipping probe");
                return None;
            }
        };

        match self.provider.fetch_quote(&symbol).await {
            Ok(history) if history.has_valid_close() => Some(symbol),
            Ok(_) => {
                debug!(symbol = %symbol, provider = self.provider.name(), "Probe returned no prices");
                None
            }
            Err(err) => {
                warn!(symbol = %symbol, provider = self.provider.name(), error = %err, "Quote probe failed");
                None
            }
        }
    }
}
