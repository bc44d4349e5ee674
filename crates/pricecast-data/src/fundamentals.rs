//! Best-effort company snapshot.

use pricecast_core::{Fundamentals, MarketDataProvider, Symbol};
use tracing::warn;

/// Look up fundamentals from the provider's quote meta.
///
/// Never fails: any problem becomes [`Fundamentals::Unavailable`].
pub async fn fetch_fundamentals(provider: &dyn MarketDataProvider, symbol: &Symbol) -> Fundamentals {
    match provider.fetch_quote(symbol).await {
        Ok(history) => Fundamentals::from_summary(history.meta.to_summary()),
        Err(err) => {
            warn!(symbol = %symbol, provider = provider.name(), error = %err, "Fundamentals lookup failed");
            Fundamentals::unavailable(err.to_string())
        }
    }
}
